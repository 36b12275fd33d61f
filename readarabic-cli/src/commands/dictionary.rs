//! Dictionary list management; entries are numbered from 1
use crate::context::AppContext;
use crate::output;
use anyhow::{anyhow, Context, Result};
use readarabic_core::sync::delete_word;

pub fn list_dictionary(ctx: &AppContext, json: bool) -> Result<()> {
    let dictionary = ctx.local.load_dictionary().context("Failed to read dictionary")?;
    if json {
        return output::print_json("dictionary.list", dictionary.entries());
    }
    if dictionary.is_empty() {
        println!("Dictionary is empty");
        return Ok(());
    }
    for (idx, entry) in dictionary.entries().iter().enumerate() {
        println!("{:>4}  {}  {}", idx + 1, entry.arabic, entry.english);
    }
    Ok(())
}

pub fn edit_dictionary(ctx: &AppContext, index: usize, english: &str) -> Result<()> {
    let mut dictionary = ctx.local.load_dictionary().context("Failed to read dictionary")?;
    let entry = index
        .checked_sub(1)
        .and_then(|idx| dictionary.edit(idx, english))
        .ok_or_else(|| anyhow!("No dictionary entry {}", index))?;
    ctx.local
        .save_dictionary(&dictionary)
        .context("Failed to save dictionary")?;
    println!("{}  {} → {}", entry.arabic, entry.english, english);
    Ok(())
}

/// Remove an entry and every inline translation saved under its word
///
/// Signed in, the matching vocabulary records are deleted first; a failure
/// there leaves the entry in place.
pub async fn delete_dictionary(ctx: &AppContext, index: usize) -> Result<()> {
    let mut dictionary = ctx.local.load_dictionary().context("Failed to read dictionary")?;
    let key = index
        .checked_sub(1)
        .and_then(|idx| dictionary.get(idx))
        .map(|entry| entry.lookup_key().to_string())
        .ok_or_else(|| anyhow!("No dictionary entry {}", index))?;

    let mut removed = 0;
    if let Some(user) = ctx.user()? {
        removed += delete_word(&ctx.api()?, &user.id, &key)
            .await
            .with_context(|| format!("Failed to delete saved translations of {key}"))?;
    }
    removed += ctx
        .local
        .remove_annotation_key(&key)
        .context("Failed to update saved annotations")?;

    let entry = dictionary
        .remove(index - 1)
        .ok_or_else(|| anyhow!("No dictionary entry {}", index))?;
    ctx.local
        .save_dictionary(&dictionary)
        .context("Failed to save dictionary")?;
    println!("Removed {}  {}", entry.arabic, entry.english);
    if removed > 0 {
        println!("Cleared {removed} inline translation(s) of {key}");
    }
    Ok(())
}
