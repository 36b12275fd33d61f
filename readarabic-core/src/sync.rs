//! Reconciles the annotation store with the remote vocabulary records.

use crate::api::{ApiError, VocabularyApi};
use crate::models::{Book, NewVocabulary};
use crate::normalize::{normalize, same_key};
use crate::store::AnnotationStore;
use readarabic_types::{BookId, Position, UserId, VocabularyId};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error("failed to load vocabulary: {0}")]
    Load(ApiError),

    #[error("failed to save vocabulary: {0}")]
    Create(ApiError),

    #[error("failed to update vocabulary {id}: {source}")]
    Update { id: VocabularyId, source: ApiError },

    #[error("failed to delete vocabulary {id}: {source}")]
    Delete { id: VocabularyId, source: ApiError },

    #[error("position {0} is outside the loaded book")]
    UnknownPosition(Position),
}

/// Result of replaying remote records into the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(VocabularyId),
    /// Free tier exhausted; the caller routes to the upgrade flow
    LimitReached { vocab_count: Option<u64> },
}

pub struct SyncAdapter<'a, A: VocabularyApi + ?Sized> {
    api: &'a A,
    user: &'a UserId,
    book_id: &'a BookId,
}

impl<'a, A: VocabularyApi + ?Sized> SyncAdapter<'a, A> {
    pub fn new(api: &'a A, user: &'a UserId, book_id: &'a BookId) -> Self {
        Self { api, user, book_id }
    }

    /// Fetch the user's records for this book and replay them into `store`
    ///
    /// Records whose page cannot be found in `book`, or that carry no word
    /// position, are skipped.
    pub async fn load(
        &self,
        book: &Book,
        store: &mut AnnotationStore,
    ) -> Result<LoadReport, SyncError> {
        let records = self
            .api
            .list(self.user, Some(self.book_id))
            .await
            .map_err(SyncError::Load)?;

        let mut report = LoadReport::default();
        for record in records {
            let page_index = record
                .page_number
                .as_deref()
                .and_then(|n| book.find_page_index(n, record.volume_number.as_deref()));
            let (Some(page), Some(word)) = (page_index, record.word_position) else {
                debug!(id = %record.id, "skipping vocabulary record without a local position");
                report.skipped += 1;
                continue;
            };

            let key = normalize(&record.word);
            if key.is_empty() {
                report.skipped += 1;
                continue;
            }
            store.put_synced(&key, Position::new(page, word), record.translation, record.id);
            report.loaded += 1;
        }

        info!(
            book = %self.book_id,
            loaded = report.loaded,
            skipped = report.skipped,
            "loaded vocabulary"
        );
        Ok(report)
    }

    /// Persist a new annotation made at `position` of `book`
    pub async fn create(
        &self,
        book: &Book,
        word: &str,
        position: Position,
        translation: &str,
    ) -> Result<CreateOutcome, SyncError> {
        let page = book
            .pages
            .get(position.page)
            .ok_or(SyncError::UnknownPosition(position))?;

        let record = NewVocabulary {
            user_id: self.user.clone(),
            word: word.to_string(),
            translation: translation.to_string(),
            book_id: self.book_id.clone(),
            page_number: page.page.clone(),
            volume_number: page.vol.clone(),
            word_position: position.word,
        };

        match self.api.create(&record).await {
            Ok(id) => {
                debug!(%id, %position, "created vocabulary record");
                Ok(CreateOutcome::Created(id))
            }
            Err(ApiError::FreeLimitReached { vocab_count }) => {
                warn!(?vocab_count, "free vocabulary limit reached");
                Ok(CreateOutcome::LimitReached { vocab_count })
            }
            Err(err) => Err(SyncError::Create(err)),
        }
    }

    pub async fn update(&self, id: &VocabularyId, translation: &str) -> Result<(), SyncError> {
        self.api
            .update(id, translation)
            .await
            .map_err(|source| SyncError::Update {
                id: id.clone(),
                source,
            })
    }

    /// Delete remotely, then locally; the local entry survives a failure
    pub async fn delete(
        &self,
        store: &mut AnnotationStore,
        key: &str,
        position: Position,
    ) -> Result<bool, SyncError> {
        if let Some(id) = store.server_id(key, position).cloned() {
            self.api
                .delete(&id)
                .await
                .map_err(|source| SyncError::Delete { id, source })?;
        }
        Ok(store.delete(key, position).is_some())
    }

    /// Delete every occurrence of `key` in this book
    ///
    /// Occurrences are removed one by one in reading order; on a failure the
    /// ones not yet deleted stay in the store.
    pub async fn delete_key(
        &self,
        store: &mut AnnotationStore,
        key: &str,
    ) -> Result<usize, SyncError> {
        let mut removed = 0;
        for position in store.positions(key) {
            if self.delete(store, key, position).await? {
                removed += 1;
            }
        }
        info!(key, removed, book = %self.book_id, "deleted word");
        Ok(removed)
    }
}

/// Delete the user's vocabulary records for `key` across all books
pub async fn delete_word<A: VocabularyApi + ?Sized>(
    api: &A,
    user: &UserId,
    key: &str,
) -> Result<usize, SyncError> {
    let records = api.list(user, None).await.map_err(SyncError::Load)?;
    let mut removed = 0;
    for record in records.iter().filter(|r| same_key(&r.word, key)) {
        api.delete(&record.id)
            .await
            .map_err(|source| SyncError::Delete {
                id: record.id.clone(),
                source,
            })?;
        removed += 1;
    }
    info!(key, removed, "deleted word from vocabulary");
    Ok(removed)
}
