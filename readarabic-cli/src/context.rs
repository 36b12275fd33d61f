//! Configuration, local state and API handle shared by the commands.

use crate::cache;
use crate::BookArgs;
use anyhow::{anyhow, Context, Result};
use readarabic_client::HttpApi;
use readarabic_core::config::normalize_api_url;
use readarabic_core::models::{Book, User};
use readarabic_core::{Config, LocalState, ReaderSession};
use readarabic_types::BookId;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub struct AppContext {
    pub config: Config,
    pub local: LocalState,
}

impl AppContext {
    /// Load the config file, then apply the command-line overrides
    pub fn load(config_path: &Path, api_url: Option<&str>, data_dir: Option<&Path>) -> Result<Self> {
        let mut config =
            Config::load_or_default(config_path).context("Failed to load configuration")?;
        if let Some(url) = api_url {
            config.api.base_url = normalize_api_url(url);
        }
        let data_dir = data_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| config.data_dir());
        tracing::debug!(api = %config.api_base_url(), data_dir = %data_dir.display(), "loaded context");

        Ok(Self {
            local: LocalState::new(data_dir),
            config,
        })
    }

    pub fn api(&self) -> Result<HttpApi> {
        HttpApi::from_config(&self.config)
            .with_context(|| format!("Invalid API URL {:?}", self.config.api_base_url()))
    }

    pub fn user(&self) -> Result<Option<User>> {
        self.local.load_user().context("Failed to read session")
    }

    pub fn require_user(&self) -> Result<User> {
        self.user()?
            .ok_or_else(|| anyhow!("Not logged in. Run `readarabic login` first."))
    }

    /// Build a reader session for the selected book
    ///
    /// Signed in, annotations come from the server. Signed out, they come
    /// from the local annotations file, seeded once from legacy translations.
    pub async fn open_session(&self, api: &HttpApi, args: &BookArgs) -> Result<ReaderSession> {
        let (book_id, book) = match &args.file {
            Some(path) => read_book_file(path)?,
            None => {
                let id = BookId::new(args.book.clone().unwrap_or_default());
                let book = cache::load_or_fetch_book(&self.local, api, &id, args.refresh).await?;
                (id, book)
            }
        };

        let user = self.user()?;
        let dictionary = self
            .local
            .load_dictionary()
            .context("Failed to read dictionary")?;
        let signed_in = user.is_some();
        let mut session = ReaderSession::new(book_id.clone(), book, user, dictionary);

        if signed_in {
            session
                .load_vocabulary(api)
                .await
                .context("Failed to load vocabulary")?;
        } else if self.local.has_annotations(&book_id) {
            session.restore_annotations(self.local.load_annotations(&book_id)?);
        } else {
            let legacy = self.local.load_legacy_translations()?;
            if !legacy.is_empty() {
                session.merge_legacy(&legacy);
            }
        }
        Ok(session)
    }

    /// Write back what a session changed locally
    pub fn save_session(&self, session: &ReaderSession) -> Result<()> {
        self.local
            .save_dictionary(session.dictionary())
            .context("Failed to save dictionary")?;
        if session.user().is_none() {
            self.local
                .save_annotations(session.book_id(), session.store())
                .context("Failed to save annotations")?;
        }
        Ok(())
    }
}

/// A book file holds either the bare book or the API envelope around it
#[derive(Deserialize)]
#[serde(untagged)]
enum BookFile {
    Envelope { book: Book },
    Bare(Book),
}

fn read_book_file(path: &Path) -> Result<(BookId, Book)> {
    let data = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let book = match serde_json::from_str::<BookFile>(&data)
        .with_context(|| format!("Failed to parse book file {:?}", path))?
    {
        BookFile::Envelope { book } | BookFile::Bare(book) => book,
    };
    let id = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "local".to_string());
    Ok((BookId::new(id), book))
}
