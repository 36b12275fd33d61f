//! Content model structs for books, vocabulary and accounts.

use once_cell::sync::Lazy;
use readarabic_types::{BookId, CategoryId, UserId, VocabularyId};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

/// Volume and page fields arrive as either numbers or strings
fn de_opt_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        Number(i64),
        Float(f64),
        Str(String),
    }

    Ok(match Option::<Text>::deserialize(deserializer)? {
        Some(Text::Number(n)) => Some(n.to_string()),
        Some(Text::Float(f)) => Some(f.to_string()),
        Some(Text::Str(s)) if s.trim().is_empty() => None,
        Some(Text::Str(s)) => Some(s.trim().to_string()),
        None => None,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "cat_id")]
    pub id: CategoryId,

    #[serde(rename = "category_name")]
    pub name: String,

    #[serde(default)]
    pub book_count: Option<u64>,
}

static INFO_AUTHOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"المؤلف:\s*(.+?)(?:\n|\[|$)").expect("author pattern is valid"));
static INFO_PAGES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"عدد الصفحات:\s*(\d+)").expect("page count pattern is valid"));

/// Book entry in the catalog listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: BookId,

    pub name: String,

    #[serde(default)]
    pub category_name: Option<String>,

    /// Free-form bibliographic blurb ("المؤلف: …", "عدد الصفحات: …")
    #[serde(default)]
    pub info: Option<String>,
}

impl BookSummary {
    pub fn author(&self) -> Option<&str> {
        let info = self.info.as_deref()?;
        INFO_AUTHOR
            .captures(info)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
    }

    pub fn page_count(&self) -> Option<u32> {
        let info = self.info.as_deref()?;
        INFO_PAGES
            .captures(info)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookMeta {
    #[serde(default)]
    pub name: Option<String>,
}

/// One page of a loaded book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default, deserialize_with = "de_opt_text")]
    pub vol: Option<String>,

    /// Printed page number
    #[serde(default, deserialize_with = "de_opt_text")]
    pub page: Option<String>,

    #[serde(default)]
    pub text: String,
}

/// Table-of-contents heading; `page` is 1-based into the pages array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub title: String,

    #[serde(default)]
    pub level: u8,

    pub page: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookIndexes {
    #[serde(default)]
    pub headings: Vec<Heading>,
}

/// Full book content as served by `GET /api/book/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default)]
    pub meta: BookMeta,

    #[serde(default)]
    pub pages: Vec<Page>,

    #[serde(default)]
    pub indexes: BookIndexes,
}

/// Resolved table-of-contents row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TocEntry {
    pub title: String,
    pub level: u8,
    pub page_index: usize,
    pub page_number: String,
}

impl Book {
    pub fn title(&self) -> &str {
        self.meta.name.as_deref().unwrap_or("Book")
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Array index of the first page carrying a printed page number
    ///
    /// When `volume` is given and a page carries one too, both must agree.
    pub fn find_page_index(&self, page_number: &str, volume: Option<&str>) -> Option<usize> {
        let page_number = page_number.trim();
        self.pages.iter().position(|p| {
            let page_ok = p.page.as_deref() == Some(page_number);
            let vol_ok = match (volume, p.vol.as_deref()) {
                (Some(wanted), Some(have)) => wanted.trim() == have,
                _ => true,
            };
            page_ok && vol_ok
        })
    }

    /// Table of contents with headings mapped to page indices
    pub fn toc(&self) -> Vec<TocEntry> {
        self.indexes
            .headings
            .iter()
            .map(|h| {
                let page_index = h.page.saturating_sub(1);
                let page_number = self
                    .pages
                    .get(page_index)
                    .and_then(|p| p.page.clone())
                    .unwrap_or_else(|| h.page.to_string());
                TocEntry {
                    title: h.title.clone(),
                    level: h.level,
                    page_index,
                    page_number,
                }
            })
            .collect()
    }
}

/// Dictionary entry returned by `GET /api/define/:word`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    #[serde(default)]
    pub form: Option<String>,

    #[serde(default)]
    pub voc_form: Option<String>,

    #[serde(default)]
    pub nice_gloss: Option<String>,

    #[serde(default)]
    pub root: Option<String>,
}

impl Definition {
    /// Vocalized form when present, bare form otherwise
    pub fn display_form(&self) -> &str {
        self.voc_form
            .as_deref()
            .or(self.form.as_deref())
            .unwrap_or("N/A")
    }

    pub fn gloss(&self) -> &str {
        self.nice_gloss.as_deref().unwrap_or("N/A")
    }

    /// Root letters joined with hyphens (e.g. "ك-ت-ب")
    pub fn root_display(&self) -> Option<String> {
        let root = self.root.as_deref()?.trim();
        if root.is_empty() {
            return None;
        }
        Some(
            root.chars()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join("-"),
        )
    }
}

/// Server-side persisted annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyRecord {
    pub id: VocabularyId,

    #[serde(default)]
    pub user_id: Option<UserId>,

    /// Word as selected, diacritics included
    pub word: String,

    pub translation: String,

    #[serde(default)]
    pub book_id: Option<BookId>,

    #[serde(default, deserialize_with = "de_opt_text")]
    pub page_number: Option<String>,

    #[serde(default, deserialize_with = "de_opt_text")]
    pub volume_number: Option<String>,

    #[serde(default)]
    pub word_position: Option<usize>,

    #[serde(default)]
    pub next_review: Option<String>,

    #[serde(default)]
    pub review_count: Option<u32>,
}

/// Body of `POST /api/vocabulary`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewVocabulary {
    pub user_id: UserId,
    pub word: String,
    pub translation: String,
    pub book_id: BookId,
    pub page_number: Option<String>,
    pub volume_number: Option<String>,
    pub word_position: usize,
}

/// Book listed under `GET /api/vocabulary/:userId/recent-books`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentBook {
    pub book_id: BookId,

    #[serde(default, alias = "name")]
    pub book_name: Option<String>,

    #[serde(default)]
    pub word_count: Option<u64>,

    #[serde(default)]
    pub last_added: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
    Expired,
    #[serde(other)]
    Unknown,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Cancelled => "cancelled",
            SubscriptionStatus::Expired => "expired",
            SubscriptionStatus::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Monthly,
    Annual,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Monthly => "monthly",
            Plan::Annual => "annual",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub status: SubscriptionStatus,

    #[serde(default)]
    pub subscription_type: Option<Plan>,

    #[serde(default)]
    pub amount: Option<serde_json::Value>,

    #[serde(default)]
    pub started_at: Option<String>,

    #[serde(default)]
    pub next_billing_date: Option<String>,

    #[serde(default)]
    pub expires_at: Option<String>,
}

/// Body of `POST /api/subscription/create`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSubscription {
    pub user_id: UserId,
    pub paypal_subscription_id: String,
    pub paypal_plan_id: String,
    pub subscription_type: Plan,
}

/// Signed-in user as returned by the auth endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub picture: Option<String>,
}
