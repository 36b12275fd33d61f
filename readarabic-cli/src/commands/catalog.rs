//! Catalog browsing: categories, books and tables of contents
use crate::context::AppContext;
use crate::output;
use crate::BookArgs;
use anyhow::{Context, Result};
use readarabic_core::api::CatalogApi;
use readarabic_types::CategoryId;

pub async fn list_categories(ctx: &AppContext, json: bool) -> Result<()> {
    let categories = ctx
        .api()?
        .categories()
        .await
        .context("Failed to fetch categories")?;

    if json {
        return output::print_json("catalog.categories", categories);
    }
    for category in &categories {
        match category.book_count {
            Some(count) => println!("{:>6}  {} ({count} books)", category.id, category.name),
            None => println!("{:>6}  {}", category.id, category.name),
        }
    }
    Ok(())
}

pub async fn list_books(ctx: &AppContext, category: Option<&str>, json: bool) -> Result<()> {
    let category = category.map(CategoryId::new);
    let books = ctx
        .api()?
        .books(category.as_ref())
        .await
        .context("Failed to fetch books")?;

    if json {
        return output::print_json("catalog.books", books);
    }
    if books.is_empty() {
        println!("No books found");
        return Ok(());
    }
    for book in &books {
        println!("{:>6}  {}", book.id, book.name);
        let mut details = Vec::new();
        if let Some(author) = book.author() {
            details.push(author.to_string());
        }
        if let Some(pages) = book.page_count() {
            details.push(format!("{pages} pages"));
        }
        if let Some(category) = &book.category_name {
            details.push(category.clone());
        }
        if !details.is_empty() {
            println!("        {}", details.join(" · "));
        }
    }
    Ok(())
}

pub async fn show_toc(ctx: &AppContext, args: &BookArgs, json: bool) -> Result<()> {
    let api = ctx.api()?;
    let session = ctx.open_session(&api, args).await?;
    let toc = session.book().toc();

    if json {
        return output::print_json("book.toc", toc);
    }
    if toc.is_empty() {
        println!("{} has no table of contents", session.book().title());
        return Ok(());
    }
    println!("{}\n", session.book().title());
    for entry in &toc {
        let indent = "  ".repeat(usize::from(entry.level.saturating_sub(1)));
        println!(
            "{indent}{}  (p. {}, --page {})",
            entry.title, entry.page_number, entry.page_index
        );
    }
    Ok(())
}
