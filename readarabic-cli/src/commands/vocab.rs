//! Saved vocabulary listings
use crate::context::AppContext;
use crate::output;
use anyhow::{Context, Result};
use readarabic_core::api::VocabularyApi;
use readarabic_types::BookId;

pub async fn list_vocabulary(ctx: &AppContext, book: Option<&str>, json: bool) -> Result<()> {
    let user = ctx.require_user()?;
    let book = book.map(BookId::new);
    let records = ctx
        .api()?
        .list(&user.id, book.as_ref())
        .await
        .context("Failed to fetch vocabulary")?;

    if json {
        return output::print_json("vocab.list", records);
    }
    if records.is_empty() {
        println!("No saved vocabulary");
        return Ok(());
    }
    for record in &records {
        let mut line = format!("{}  {}", record.word, record.translation);
        if let Some(page) = &record.page_number {
            line.push_str(&format!("  (p. {page})"));
        }
        println!("{line}");
    }
    println!("\n{} words", records.len());
    Ok(())
}

pub async fn recent_books(ctx: &AppContext, json: bool) -> Result<()> {
    let user = ctx.require_user()?;
    let books = ctx
        .api()?
        .recent_books(&user.id)
        .await
        .context("Failed to fetch recent books")?;

    if json {
        return output::print_json("vocab.recent_books", books);
    }
    for book in &books {
        let name = book.book_name.as_deref().unwrap_or(book.book_id.as_str());
        match book.word_count {
            Some(count) => println!("{:>6}  {name} ({count} words)", book.book_id),
            None => println!("{:>6}  {name}", book.book_id),
        }
    }
    Ok(())
}
