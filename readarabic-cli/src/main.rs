//! # readarabic CLI
//!
//! Terminal front end for the ReadArabic reader.

mod cache;
mod commands;
mod context;
mod output;

use clap::{Args, Parser, Subcommand, ValueEnum};
use context::AppContext;
use readarabic_types::Position;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "readarabic")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "readarabic.yml")]
    config: PathBuf,

    /// Override the API base URL
    #[arg(long, env = "READARABIC_API_URL")]
    api_url: Option<String>,

    /// Override the directory holding session and dictionary files
    #[arg(long, env = "READARABIC_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Which book to operate on
#[derive(Args, Clone, Debug)]
pub struct BookArgs {
    /// Book id on the server
    #[arg(long, required_unless_present = "file", conflicts_with = "file")]
    pub book: Option<String>,

    /// Read the book from a local JSON file instead
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Ignore the cached copy and fetch the book again
    #[arg(long)]
    pub refresh: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with a Google credential or OAuth authorization code
    Login {
        /// Google ID token
        #[arg(long, required_unless_present = "code", conflicts_with = "code")]
        credential: Option<String>,

        /// OAuth authorization code
        #[arg(long)]
        code: Option<String>,

        /// Redirect URI used to obtain the code (defaults to google.redirect_uri)
        #[arg(long)]
        redirect_uri: Option<String>,
    },

    /// Forget the signed-in user
    Logout,

    /// Show the signed-in user
    Whoami {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List book categories
    Categories {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List books, optionally within one category
    Books {
        /// Category id
        #[arg(long)]
        category: Option<String>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Table of contents of a book
    Toc {
        #[command(flatten)]
        book: BookArgs,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print a page with inline translations
    Read {
        #[command(flatten)]
        book: BookArgs,

        /// Page index (0-based)
        #[arg(long, default_value_t = 0, conflicts_with = "printed")]
        page: usize,

        /// Printed page number instead of an index
        #[arg(long)]
        printed: Option<String>,

        /// Volume of the printed page number
        #[arg(long, requires = "printed")]
        volume: Option<String>,

        /// Show word indices
        #[arg(long)]
        positions: bool,

        /// Hide inline translations
        #[arg(long)]
        no_glosses: bool,
    },

    /// Look a word or phrase up
    Lookup {
        /// Arabic text
        text: String,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Translate the word at a position and save it
    Annotate {
        #[command(flatten)]
        book: BookArgs,

        /// Word position as PAGE-WORD
        #[arg(long)]
        at: Position,

        /// Use this translation instead of looking the word up
        #[arg(long)]
        translation: Option<String>,

        /// Row of the lookup result to save
        #[arg(long, default_value_t = 0)]
        pick: usize,

        /// Reuse the translation the word already has elsewhere
        #[arg(long, conflicts_with = "other")]
        use_existing: bool,

        /// Save the picked row even if the word is translated elsewhere
        #[arg(long)]
        other: bool,
    },

    /// Change the translation at a position
    Edit {
        #[command(flatten)]
        book: BookArgs,

        /// Word position as PAGE-WORD
        #[arg(long)]
        at: Position,

        /// New translation
        translation: String,
    },

    /// Remove the translation at a position
    Delete {
        #[command(flatten)]
        book: BookArgs,

        /// Word position as PAGE-WORD
        #[arg(long)]
        at: Position,
    },

    /// List the translations saved for a book
    Annotations {
        #[command(flatten)]
        book: BookArgs,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Saved vocabulary
    Vocab {
        #[command(subcommand)]
        command: VocabCommands,
    },

    /// Review due vocabulary as flashcards
    Practice {
        /// Only cards from this book
        #[arg(long)]
        book: Option<String>,
    },

    /// Manage the premium subscription
    Subscription {
        #[command(subcommand)]
        command: SubscriptionCommands,
    },

    /// Manage the dictionary list
    Dictionary {
        #[command(subcommand)]
        command: DictionaryCommands,
    },

    /// Split a text file into positioned tokens
    Tokenize {
        /// Plain text file, read as a single page
        file: PathBuf,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Inspect configuration values
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum VocabCommands {
    /// List saved vocabulary
    List {
        /// Only vocabulary from this book
        #[arg(long)]
        book: Option<String>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Books with recently saved vocabulary
    Recent {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Copy, Clone, ValueEnum)]
pub enum PlanArg {
    Monthly,
    Annual,
}

#[derive(Subcommand)]
pub enum SubscriptionCommands {
    /// Show the current subscription
    Status {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Cancel the current subscription
    Cancel,

    /// Record a completed PayPal subscription
    Create {
        /// Plan that was purchased
        #[arg(long, value_enum)]
        plan: PlanArg,

        /// Subscription id returned by PayPal
        #[arg(long)]
        paypal_subscription_id: String,
    },
}

#[derive(Subcommand)]
pub enum DictionaryCommands {
    /// List saved words
    List {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Change the English gloss of an entry
    Edit {
        /// Entry number as shown by `dictionary list`
        index: usize,

        /// New gloss
        english: String,
    },

    /// Remove an entry
    Delete {
        /// Entry number as shown by `dictionary list`
        index: usize,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print a value by dotted key (e.g. api.base_url)
    Get { key: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for command output
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let ctx = AppContext::load(&cli.config, cli.api_url.as_deref(), cli.data_dir.as_deref())?;

    match cli.command {
        Commands::Login {
            credential,
            code,
            redirect_uri,
        } => {
            commands::login(&ctx, credential.as_deref(), code.as_deref(), redirect_uri.as_deref())
                .await
        }
        Commands::Logout => commands::logout(&ctx),
        Commands::Whoami { json } => commands::whoami(&ctx, json),
        Commands::Categories { json } => commands::list_categories(&ctx, json).await,
        Commands::Books { category, json } => {
            commands::list_books(&ctx, category.as_deref(), json).await
        }
        Commands::Toc { book, json } => commands::show_toc(&ctx, &book, json).await,
        Commands::Read {
            book,
            page,
            printed,
            volume,
            positions,
            no_glosses,
        } => {
            let opts = commands::ReadOptions {
                page,
                printed,
                volume,
                positions,
                no_glosses,
            };
            commands::read_page(&ctx, &book, opts).await
        }
        Commands::Lookup { text, json } => commands::lookup(&ctx, &text, json).await,
        Commands::Annotate {
            book,
            at,
            translation,
            pick,
            use_existing,
            other,
        } => {
            let opts = commands::AnnotateOptions {
                at,
                translation,
                pick,
                use_existing,
                other,
            };
            commands::annotate(&ctx, &book, opts).await
        }
        Commands::Edit {
            book,
            at,
            translation,
        } => commands::edit_annotation(&ctx, &book, at, &translation).await,
        Commands::Delete { book, at } => commands::delete_annotation(&ctx, &book, at).await,
        Commands::Annotations { book, json } => commands::list_annotations(&ctx, &book, json).await,
        Commands::Vocab { command } => match command {
            VocabCommands::List { book, json } => {
                commands::list_vocabulary(&ctx, book.as_deref(), json).await
            }
            VocabCommands::Recent { json } => commands::recent_books(&ctx, json).await,
        },
        Commands::Practice { book } => commands::practice(&ctx, book.as_deref()).await,
        Commands::Subscription { command } => match command {
            SubscriptionCommands::Status { json } => commands::subscription_status(&ctx, json).await,
            SubscriptionCommands::Cancel => commands::cancel_subscription(&ctx).await,
            SubscriptionCommands::Create {
                plan,
                paypal_subscription_id,
            } => commands::create_subscription(&ctx, plan, &paypal_subscription_id).await,
        },
        Commands::Dictionary { command } => match command {
            DictionaryCommands::List { json } => commands::list_dictionary(&ctx, json),
            DictionaryCommands::Edit { index, english } => {
                commands::edit_dictionary(&ctx, index, &english)
            }
            DictionaryCommands::Delete { index } => {
                commands::delete_dictionary(&ctx, index).await
            }
        },
        Commands::Tokenize { file, json } => commands::tokenize_file(&file, json),
        Commands::Config { command } => match command {
            ConfigCommands::Get { key } => commands::config_get(&ctx, &key),
        },
    }
}
