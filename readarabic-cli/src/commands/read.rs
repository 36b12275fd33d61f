//! Page reading and annotation listing
use crate::context::AppContext;
use crate::output::{self, AnnotationRow};
use crate::BookArgs;
use anyhow::{anyhow, bail, Result};
use readarabic_core::render::{render_page, RenderOptions};

pub struct ReadOptions {
    pub page: usize,
    pub printed: Option<String>,
    pub volume: Option<String>,
    pub positions: bool,
    pub no_glosses: bool,
}

pub async fn read_page(ctx: &AppContext, args: &BookArgs, opts: ReadOptions) -> Result<()> {
    let api = ctx.api()?;
    let session = ctx.open_session(&api, args).await?;
    let book = session.book();

    let index = match &opts.printed {
        Some(printed) => book
            .find_page_index(printed, opts.volume.as_deref())
            .ok_or_else(|| anyhow!("No page numbered {} in {}", printed, book.title()))?,
        None => opts.page,
    };
    let Some(page) = session.pages().get(index) else {
        bail!(
            "Page {} out of range ({} has {} pages)",
            index,
            book.title(),
            book.page_count()
        );
    };

    let meta = &book.pages[index];
    let mut header = format!("{} · page {}/{}", book.title(), index + 1, book.page_count());
    if let Some(printed) = &meta.page {
        header.push_str(&format!(" · p. {printed}"));
    }
    if let Some(vol) = &meta.vol {
        header.push_str(&format!(" · vol. {vol}"));
    }
    println!("{header}\n");

    let render = RenderOptions {
        show_positions: opts.positions,
        hide_glosses: opts.no_glosses,
    };
    println!("{}", render_page(page, session.store(), render));
    Ok(())
}

pub async fn list_annotations(ctx: &AppContext, args: &BookArgs, json: bool) -> Result<()> {
    let api = ctx.api()?;
    let session = ctx.open_session(&api, args).await?;
    let rows: Vec<AnnotationRow> = session
        .store()
        .iter()
        .into_iter()
        .map(|(key, position, annotation)| AnnotationRow {
            position: position.to_string(),
            key,
            translation: &annotation.translation,
            server_id: annotation.server_id.as_ref().map(|id| id.as_str()),
        })
        .collect();

    if json {
        return output::print_json("book.annotations", &rows);
    }
    if rows.is_empty() {
        println!("No translations saved for {}", session.book().title());
        return Ok(());
    }
    for row in &rows {
        println!("{:>9}  {}  {}", row.position, row.key, row.translation);
    }
    Ok(())
}
