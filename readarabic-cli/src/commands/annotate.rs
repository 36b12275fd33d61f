//! Lookup and the annotate/edit/delete flow
use crate::context::AppContext;
use crate::output;
use crate::BookArgs;
use anyhow::{anyhow, bail, Context, Result};
use readarabic_core::lookup::{look_up, AiGloss, LookupOutcome, LookupResult};
use readarabic_core::{ConfirmOutcome, PopupState, ReaderSession};
use readarabic_types::Position;

pub struct AnnotateOptions {
    pub at: Position,
    pub translation: Option<String>,
    pub pick: usize,
    pub use_existing: bool,
    pub other: bool,
}

pub async fn lookup(ctx: &AppContext, text: &str, json: bool) -> Result<()> {
    let api = ctx.api()?;
    let outcome = look_up(&api, text).await;

    if json {
        return output::print_json("lookup.outcome", &outcome);
    }
    match outcome {
        LookupOutcome::Found { result } => print_result(&result),
        LookupOutcome::NotFound => println!("No translation found for {text}"),
        LookupOutcome::Failed { message } => bail!("Lookup failed: {}", message),
    }
    Ok(())
}

fn print_result(result: &LookupResult) {
    match result {
        LookupResult::Dictionary { definitions } => {
            for (idx, def) in definitions.iter().enumerate() {
                let mut line = format!("{idx:>3}  {}  {}", def.display_form(), def.gloss());
                if let Some(root) = def.root_display() {
                    line.push_str(&format!("  (root {root})"));
                }
                println!("{line}");
            }
        }
        LookupResult::Ai(gloss) => println!("  0  {}  {}", gloss.text, gloss.gloss),
    }
}

pub async fn annotate(ctx: &AppContext, args: &BookArgs, opts: AnnotateOptions) -> Result<()> {
    let api = ctx.api()?;
    let mut session = ctx.open_session(&api, args).await?;

    let Some(ticket) = session.select_word(opts.at) else {
        bail!("No word at {} in {}", opts.at, session.book().title());
    };
    let text = session
        .popup()
        .selection()
        .map(|s| s.text.clone())
        .unwrap_or_default();

    match &opts.translation {
        Some(translation) => {
            let gloss = AiGloss {
                text: text.clone(),
                gloss: translation.clone(),
            };
            let outcome = LookupOutcome::Found {
                result: LookupResult::Ai(gloss),
            };
            session.complete_lookup(ticket, outcome);
        }
        None => {
            session.look_up(&api, ticket).await;
        }
    }

    match session.popup() {
        PopupState::ShowingNotFound { .. } => bail!("No translation found for {}", text),
        PopupState::ShowingError { message, .. } => bail!("Lookup failed: {}", message),
        PopupState::ShowingDefinitions { result, .. }
        | PopupState::ShowingTranslation { result, .. }
            if opts.translation.is_none() =>
        {
            print_result(result)
        }
        _ => {}
    }

    let pick = if opts.translation.is_some() { 0 } else { opts.pick };
    let outcome = match session.confirm(&api, pick).await? {
        ConfirmOutcome::NeedsChoice { .. } if opts.use_existing => {
            session.use_existing(&api).await?
        }
        ConfirmOutcome::NeedsChoice { .. } if opts.other => {
            session.look_up_other();
            session.confirm(&api, pick).await?
        }
        ConfirmOutcome::NeedsChoice { existing } => {
            println!("{text} is already translated as \"{existing}\" elsewhere in this book.");
            println!("Re-run with --use-existing to reuse it, or --other to save the new translation.");
            return Ok(());
        }
        outcome => outcome,
    };

    finish(ctx, &session, &text, outcome)
}

fn finish(ctx: &AppContext, session: &ReaderSession, text: &str, outcome: ConfirmOutcome) -> Result<()> {
    match outcome {
        ConfirmOutcome::Saved {
            position,
            translation,
        } => {
            ctx.save_session(session)?;
            println!("✅ {text} [{translation}] saved at {position}");
            Ok(())
        }
        ConfirmOutcome::NeedsChoice { existing } => {
            bail!("{} is already translated as \"{}\"", text, existing)
        }
        ConfirmOutcome::PositionNotFound => {
            bail!("Could not save {}: its position on the page is unknown", text)
        }
        ConfirmOutcome::UpgradeRequired { vocab_count } => {
            let count = vocab_count
                .map(|n| format!(" ({n} words saved)"))
                .unwrap_or_default();
            bail!(
                "Free vocabulary limit reached{}. Upgrade with `readarabic subscription create`.",
                count
            )
        }
        ConfirmOutcome::Ignored => Err(anyhow!("Nothing to save for {}", text)),
    }
}

pub async fn edit_annotation(
    ctx: &AppContext,
    args: &BookArgs,
    at: Position,
    translation: &str,
) -> Result<()> {
    let api = ctx.api()?;
    let mut session = ctx.open_session(&api, args).await?;
    session
        .edit(&api, at, translation)
        .await
        .with_context(|| format!("Failed to update translation at {at}"))?;
    ctx.save_session(&session)?;
    println!("Updated {at} to \"{translation}\"");
    Ok(())
}

pub async fn delete_annotation(ctx: &AppContext, args: &BookArgs, at: Position) -> Result<()> {
    let api = ctx.api()?;
    let mut session = ctx.open_session(&api, args).await?;
    session
        .delete(&api, at)
        .await
        .with_context(|| format!("Failed to delete translation at {at}"))?;
    ctx.save_session(&session)?;
    println!("Removed translation at {at}");
    Ok(())
}
