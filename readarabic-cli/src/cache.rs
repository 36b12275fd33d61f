//! Disk cache for fetched books so repeated commands skip the download.

use anyhow::{Context, Result};
use chrono::Utc;
use readarabic_client::HttpApi;
use readarabic_core::api::CatalogApi;
use readarabic_core::models::Book;
use readarabic_core::LocalState;
use readarabic_types::BookId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const CACHE_VERSION: &str = "1";
const CACHE_DIR: &str = "books";

#[derive(Serialize, Deserialize)]
struct CachedBook {
    version: String,
    fetched_at: String,
    book: Book,
}

fn cache_path(local: &LocalState, id: &BookId) -> PathBuf {
    let stem: String = id
        .as_str()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    local.dir().join(CACHE_DIR).join(format!("{stem}.json"))
}

/// Persist a fetched book next to the other local state.
pub fn write_book_cache(local: &LocalState, id: &BookId, book: &Book) -> Result<()> {
    let path = cache_path(local, id);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create cache dir {:?}", parent))?;
    }

    let payload = CachedBook {
        version: CACHE_VERSION.to_string(),
        fetched_at: Utc::now().to_rfc3339(),
        book: book.clone(),
    };

    let json = serde_json::to_vec(&payload).context("Failed to serialize book cache")?;
    fs::write(&path, json).with_context(|| format!("Failed to write cache {:?}", path))?;
    Ok(())
}

/// Load the cached book if present and compatible.
pub fn load_cached_book(local: &LocalState, id: &BookId) -> Result<Option<Book>> {
    let path = cache_path(local, id);
    if !path.exists() {
        return Ok(None);
    }

    let data = fs::read(&path).with_context(|| format!("Failed to read cache {:?}", path))?;
    match serde_json::from_slice::<CachedBook>(&data) {
        Ok(cache) if cache.version == CACHE_VERSION => Ok(Some(cache.book)),
        Ok(_) => Ok(None),
        Err(err) => {
            tracing::warn!("Failed to parse book cache: {}", err);
            Ok(None)
        }
    }
}

/// Prefer the cache, falling back to the API.
pub async fn load_or_fetch_book(
    local: &LocalState,
    api: &HttpApi,
    id: &BookId,
    refresh: bool,
) -> Result<Book> {
    if !refresh {
        if let Some(book) = load_cached_book(local, id)? {
            return Ok(book);
        }
    }

    let book = api
        .book(id)
        .await
        .with_context(|| format!("Failed to load book {id}"))?;

    if let Err(err) = write_book_cache(local, id, &book) {
        tracing::warn!("Could not write book cache: {}", err);
    }

    Ok(book)
}
