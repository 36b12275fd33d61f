//! Remote API surface consumed by the reader.
//!
//! The traits are implemented over HTTP by `readarabic-client`; tests use
//! in-memory fakes.

use crate::models::{
    Book, BookSummary, Category, Definition, NewSubscription, NewVocabulary, RecentBook,
    Subscription, User, VocabularyRecord,
};
use async_trait::async_trait;
use readarabic_types::{BookId, CategoryId, UserId, VocabularyId};
use thiserror::Error;

/// Error code the API uses when a free account hits its vocabulary quota
pub const FREE_LIMIT_REACHED: &str = "FREE_LIMIT_REACHED";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("free vocabulary limit reached")]
    FreeLimitReached { vocab_count: Option<u64> },

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_quota(&self) -> bool {
        matches!(self, ApiError::FreeLimitReached { .. })
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn categories(&self) -> ApiResult<Vec<Category>>;

    async fn books(&self, category: Option<&CategoryId>) -> ApiResult<Vec<BookSummary>>;

    async fn book(&self, id: &BookId) -> ApiResult<Book>;
}

#[async_trait]
pub trait LookupApi: Send + Sync {
    /// Dictionary definitions for a single word; empty when none are known
    async fn define(&self, word: &str) -> ApiResult<Vec<Definition>>;

    /// Free-form AI translation
    async fn translate(&self, text: &str, is_single_word: bool) -> ApiResult<String>;
}

#[async_trait]
pub trait VocabularyApi: Send + Sync {
    async fn list(&self, user: &UserId, book: Option<&BookId>) -> ApiResult<Vec<VocabularyRecord>>;

    async fn create(&self, record: &NewVocabulary) -> ApiResult<VocabularyId>;

    async fn update(&self, id: &VocabularyId, translation: &str) -> ApiResult<()>;

    async fn delete(&self, id: &VocabularyId) -> ApiResult<()>;

    async fn recent_books(&self, user: &UserId) -> ApiResult<Vec<RecentBook>>;

    async fn due(&self, user: &UserId, book: Option<&BookId>) -> ApiResult<Vec<VocabularyRecord>>;

    async fn review(&self, id: &VocabularyId, correct: bool) -> ApiResult<()>;
}

#[async_trait]
pub trait SubscriptionApi: Send + Sync {
    /// Current subscription, `None` for free accounts
    async fn status(&self, user: &UserId) -> ApiResult<Option<Subscription>>;

    async fn cancel(&self, user: &UserId) -> ApiResult<()>;

    async fn create(&self, subscription: &NewSubscription) -> ApiResult<()>;
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange a Google ID token credential for a user
    async fn google_credential(&self, credential: &str) -> ApiResult<User>;

    /// Exchange an OAuth authorization code for a user
    async fn google_callback(&self, code: &str, redirect_uri: &str) -> ApiResult<User>;
}

/// Everything the reader talks to
pub trait ReaderApi: CatalogApi + LookupApi + VocabularyApi + SubscriptionApi + AuthApi {}

impl<T> ReaderApi for T where T: CatalogApi + LookupApi + VocabularyApi + SubscriptionApi + AuthApi
{}
