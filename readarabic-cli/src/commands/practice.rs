//! Interactive flashcard review on the terminal
use crate::context::AppContext;
use anyhow::{Context, Result};
use readarabic_core::practice::{report, PracticeSession};
use readarabic_types::BookId;
use std::io::{self, BufRead, Write};

pub async fn practice(ctx: &AppContext, book: Option<&str>) -> Result<()> {
    let user = ctx.require_user()?;
    let api = ctx.api()?;
    let book = book.map(BookId::new);
    let mut session = PracticeSession::start(&api, &user.id, book.as_ref())
        .await
        .context("Failed to fetch due vocabulary")?;

    if session.is_complete() {
        println!("Nothing to review right now");
        return Ok(());
    }

    let total = session.stats().total;
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while let Some(card) = session.current().cloned() {
        if session.is_flipped() {
            println!("    {}", card.translation);
            print!("[1] knew it  [2] did not  [q] quit > ");
        } else {
            println!("\nCard {}/{total}: {}", session.card_number(), card.word);
            print!("[space/enter] flip  [q] quit > ");
        }
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        let key = match line.trim() {
            "" => ' ',
            "q" => break,
            other => other.chars().next().unwrap_or(' '),
        };
        if let Some(review) = session.handle_key(key) {
            report(&api, &review).await;
        }
    }

    let stats = session.stats();
    println!(
        "\n{} correct, {} incorrect of {} ({}%)",
        stats.correct,
        stats.incorrect,
        stats.total,
        stats.accuracy()
    );
    Ok(())
}
