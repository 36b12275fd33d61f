//! In-memory implementation of the reader API traits.
//!
//! Backs the unit tests; failure modes can be switched on
//! per operation.

use crate::api::{
    ApiError, ApiResult, AuthApi, CatalogApi, LookupApi, SubscriptionApi, VocabularyApi,
};
use crate::models::{
    Book, BookSummary, Category, Definition, NewSubscription, NewVocabulary, RecentBook,
    Subscription, SubscriptionStatus, User, VocabularyRecord,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use readarabic_types::{BookId, CategoryId, UserId, VocabularyId};
use std::collections::HashMap;

#[derive(Default)]
struct State {
    categories: Vec<Category>,
    summaries: Vec<BookSummary>,
    books: HashMap<BookId, Book>,
    definitions: HashMap<String, Vec<Definition>>,
    translations: HashMap<String, String>,
    records: Vec<VocabularyRecord>,
    created: Vec<NewVocabulary>,
    updated: Vec<(VocabularyId, String)>,
    deleted: Vec<VocabularyId>,
    reviews: Vec<(VocabularyId, bool)>,
    subscription: Option<Subscription>,
    user: Option<User>,
    quota_exhausted: Option<Option<u64>>,
    fail_deletes: Option<u16>,
    fail_updates: Option<u16>,
    fail_reviews: Option<u16>,
    next_id: u64,
}

#[derive(Default)]
pub struct FakeApi {
    state: Mutex<State>,
}

fn status_error(status: u16) -> ApiError {
    ApiError::Status {
        status,
        message: "simulated failure".into(),
    }
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_book(&self, id: &str, book: Book) {
        let mut state = self.state.lock();
        state.summaries.push(BookSummary {
            id: BookId::new(id),
            name: book.title().to_string(),
            category_name: None,
            info: None,
        });
        state.books.insert(BookId::new(id), book);
    }

    pub fn add_definitions(&self, word: &str, definitions: Vec<Definition>) {
        self.state
            .lock()
            .definitions
            .insert(word.to_string(), definitions);
    }

    pub fn add_translation(&self, text: &str, translation: &str) {
        self.state
            .lock()
            .translations
            .insert(text.to_string(), translation.to_string());
    }

    /// Pre-existing remote record
    pub fn seed_record(
        &self,
        id: &str,
        word: &str,
        translation: &str,
        page_number: &str,
        word_position: usize,
    ) {
        self.state.lock().records.push(VocabularyRecord {
            id: VocabularyId::new(id),
            user_id: None,
            word: word.into(),
            translation: translation.into(),
            book_id: None,
            page_number: Some(page_number.into()),
            volume_number: None,
            word_position: Some(word_position),
            next_review: None,
            review_count: None,
        });
    }

    pub fn set_quota_exhausted(&self, vocab_count: Option<u64>) {
        self.state.lock().quota_exhausted = Some(vocab_count);
    }

    pub fn fail_deletes_with(&self, status: u16) {
        self.state.lock().fail_deletes = Some(status);
    }

    pub fn fail_updates_with(&self, status: u16) {
        self.state.lock().fail_updates = Some(status);
    }

    pub fn fail_reviews_with(&self, status: u16) {
        self.state.lock().fail_reviews = Some(status);
    }

    pub fn created(&self) -> Vec<NewVocabulary> {
        self.state.lock().created.clone()
    }

    pub fn updated(&self) -> Vec<(VocabularyId, String)> {
        self.state.lock().updated.clone()
    }

    pub fn deleted(&self) -> Vec<VocabularyId> {
        self.state.lock().deleted.clone()
    }

    pub fn reviews(&self) -> Vec<(VocabularyId, bool)> {
        self.state.lock().reviews.clone()
    }
}

#[async_trait]
impl CatalogApi for FakeApi {
    async fn categories(&self) -> ApiResult<Vec<Category>> {
        Ok(self.state.lock().categories.clone())
    }

    async fn books(&self, category: Option<&CategoryId>) -> ApiResult<Vec<BookSummary>> {
        let state = self.state.lock();
        let wanted = category.and_then(|c| {
            state
                .categories
                .iter()
                .find(|cat| &cat.id == c)
                .map(|cat| cat.name.clone())
        });
        Ok(state
            .summaries
            .iter()
            .filter(|b| wanted.is_none() || b.category_name == wanted)
            .cloned()
            .collect())
    }

    async fn book(&self, id: &BookId) -> ApiResult<Book> {
        self.state
            .lock()
            .books
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::Rejected("Failed to load book".into()))
    }
}

#[async_trait]
impl LookupApi for FakeApi {
    async fn define(&self, word: &str) -> ApiResult<Vec<Definition>> {
        Ok(self
            .state
            .lock()
            .definitions
            .get(word)
            .cloned()
            .unwrap_or_default())
    }

    async fn translate(&self, text: &str, _is_single_word: bool) -> ApiResult<String> {
        self.state
            .lock()
            .translations
            .get(text)
            .cloned()
            .ok_or_else(|| ApiError::Rejected("Translation failed".into()))
    }
}

#[async_trait]
impl VocabularyApi for FakeApi {
    async fn list(&self, _user: &UserId, _book: Option<&BookId>) -> ApiResult<Vec<VocabularyRecord>> {
        Ok(self.state.lock().records.clone())
    }

    async fn create(&self, record: &NewVocabulary) -> ApiResult<VocabularyId> {
        let mut state = self.state.lock();
        if let Some(vocab_count) = state.quota_exhausted {
            return Err(ApiError::FreeLimitReached { vocab_count });
        }
        state.next_id += 1;
        let id = VocabularyId::new(format!("new-{}", state.next_id));
        state.created.push(record.clone());
        state.records.push(VocabularyRecord {
            id: id.clone(),
            user_id: Some(record.user_id.clone()),
            word: record.word.clone(),
            translation: record.translation.clone(),
            book_id: Some(record.book_id.clone()),
            page_number: record.page_number.clone(),
            volume_number: record.volume_number.clone(),
            word_position: Some(record.word_position),
            next_review: None,
            review_count: None,
        });
        Ok(id)
    }

    async fn update(&self, id: &VocabularyId, translation: &str) -> ApiResult<()> {
        let mut state = self.state.lock();
        if let Some(status) = state.fail_updates {
            return Err(status_error(status));
        }
        state.updated.push((id.clone(), translation.to_string()));
        if let Some(rec) = state.records.iter_mut().find(|r| &r.id == id) {
            rec.translation = translation.to_string();
        }
        Ok(())
    }

    async fn delete(&self, id: &VocabularyId) -> ApiResult<()> {
        let mut state = self.state.lock();
        if let Some(status) = state.fail_deletes {
            return Err(status_error(status));
        }
        state.deleted.push(id.clone());
        state.records.retain(|r| &r.id != id);
        Ok(())
    }

    async fn recent_books(&self, _user: &UserId) -> ApiResult<Vec<RecentBook>> {
        let state = self.state.lock();
        let mut seen: Vec<BookId> = Vec::new();
        for rec in &state.records {
            if let Some(book) = &rec.book_id {
                if !seen.contains(book) {
                    seen.push(book.clone());
                }
            }
        }
        Ok(seen
            .into_iter()
            .map(|book_id| RecentBook {
                book_name: state.books.get(&book_id).map(|b| b.title().to_string()),
                book_id,
                word_count: None,
                last_added: None,
            })
            .collect())
    }

    async fn due(&self, _user: &UserId, book: Option<&BookId>) -> ApiResult<Vec<VocabularyRecord>> {
        Ok(self
            .state
            .lock()
            .records
            .iter()
            .filter(|r| book.is_none() || r.book_id.as_ref() == book)
            .cloned()
            .collect())
    }

    async fn review(&self, id: &VocabularyId, correct: bool) -> ApiResult<()> {
        let mut state = self.state.lock();
        if let Some(status) = state.fail_reviews {
            return Err(status_error(status));
        }
        state.reviews.push((id.clone(), correct));
        Ok(())
    }
}

#[async_trait]
impl SubscriptionApi for FakeApi {
    async fn status(&self, _user: &UserId) -> ApiResult<Option<Subscription>> {
        Ok(self.state.lock().subscription.clone())
    }

    async fn cancel(&self, _user: &UserId) -> ApiResult<()> {
        let mut state = self.state.lock();
        match state.subscription.as_mut() {
            Some(sub) => {
                sub.status = SubscriptionStatus::Cancelled;
                Ok(())
            }
            None => Err(ApiError::Rejected("No active subscription".into())),
        }
    }

    async fn create(&self, subscription: &NewSubscription) -> ApiResult<()> {
        let mut state = self.state.lock();
        state.subscription = Some(Subscription {
            status: SubscriptionStatus::Active,
            subscription_type: Some(subscription.subscription_type),
            amount: None,
            started_at: None,
            next_billing_date: None,
            expires_at: None,
        });
        Ok(())
    }
}

#[async_trait]
impl AuthApi for FakeApi {
    async fn google_credential(&self, _credential: &str) -> ApiResult<User> {
        self.state
            .lock()
            .user
            .clone()
            .ok_or_else(|| ApiError::Rejected("Invalid credential".into()))
    }

    async fn google_callback(&self, _code: &str, _redirect_uri: &str) -> ApiResult<User> {
        self.state
            .lock()
            .user
            .clone()
            .ok_or_else(|| ApiError::Rejected("Invalid authorization code".into()))
    }
}
