//! Reader session: one open book, its annotations and the popup.
//!
//! Every UI callback of the reader is a method here. Network calls are
//! awaited while the session is borrowed mutably, so responses are applied
//! in the order the caller awaits them; the popup's ticket check drops the
//! ones that were superseded.

use crate::api::{ApiError, CatalogApi, LookupApi, VocabularyApi};
use crate::dictionary::{DictionaryEntry, DictionaryList};
use crate::lookup::{self, Candidate};
use crate::models::{Book, User};
use crate::popup::{LookupTicket, PendingSelection, Popup, PopupState, SelectionInput};
use crate::selection::{RenderTable, SelectionRange};
use crate::store::{AnnotationStore, Placement};
use crate::sync::{CreateOutcome, LoadReport, SyncAdapter, SyncError};
use crate::tokenizer::{tokenize_page, TokenizedPage};
use readarabic_types::{BookId, Position};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("no annotation at {0}")]
    NoAnnotation(Position),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// What confirming a popup row led to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Saved {
        position: Position,
        translation: String,
    },
    /// The word is annotated elsewhere; the duplicate choice is showing
    NeedsChoice { existing: String },
    /// The selection could not be tied to one word on the page
    PositionNotFound,
    /// Free vocabulary quota exhausted; nothing was saved
    UpgradeRequired { vocab_count: Option<u64> },
    /// No row to confirm in the current popup state
    Ignored,
}

pub struct ReaderSession {
    book_id: BookId,
    book: Book,
    pages: Vec<TokenizedPage>,
    table: RenderTable,
    store: AnnotationStore,
    dictionary: DictionaryList,
    user: Option<User>,
    popup: Popup,
}

impl ReaderSession {
    /// Tokenize `book` and start with an empty store
    pub fn new(book_id: BookId, book: Book, user: Option<User>, dictionary: DictionaryList) -> Self {
        let pages: Vec<TokenizedPage> = book
            .pages
            .iter()
            .enumerate()
            .map(|(idx, page)| tokenize_page(idx, &page.text))
            .collect();
        let table = RenderTable::from_pages(&pages);
        debug!(book = %book_id, pages = pages.len(), words = table.len(), "tokenized book");

        Self {
            book_id,
            book,
            pages,
            table,
            store: AnnotationStore::new(),
            dictionary,
            user,
            popup: Popup::new(),
        }
    }

    /// Fetch a book and, when signed in, its vocabulary
    pub async fn open<A>(
        api: &A,
        book_id: BookId,
        user: Option<User>,
        dictionary: DictionaryList,
    ) -> Result<Self, SessionError>
    where
        A: CatalogApi + VocabularyApi + ?Sized,
    {
        let book = api.book(&book_id).await?;
        let mut session = Self::new(book_id, book, user, dictionary);
        session.load_vocabulary(api).await?;
        Ok(session)
    }

    /// Replace the store with the user's remote annotations for this book
    pub async fn load_vocabulary<A: VocabularyApi + ?Sized>(
        &mut self,
        api: &A,
    ) -> Result<LoadReport, SessionError> {
        let Some(user) = &self.user else {
            return Ok(LoadReport::default());
        };
        let mut store = AnnotationStore::new();
        let report = SyncAdapter::new(api, &user.id, &self.book_id)
            .load(&self.book, &mut store)
            .await?;
        self.store = store;
        Ok(report)
    }

    /// Local-only mode: start from annotations saved on this machine
    pub fn restore_annotations(&mut self, store: AnnotationStore) {
        self.store = store;
    }

    /// Local-only mode: spread flat legacy translations over the book
    pub fn merge_legacy(&mut self, legacy: &HashMap<String, String>) -> usize {
        let added = self.store.merge_legacy(legacy, &self.pages);
        info!(added, "merged legacy translations");
        added
    }

    pub fn book_id(&self) -> &BookId {
        &self.book_id
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn pages(&self) -> &[TokenizedPage] {
        &self.pages
    }

    pub fn table(&self) -> &RenderTable {
        &self.table
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn dictionary(&self) -> &DictionaryList {
        &self.dictionary
    }

    pub fn into_dictionary(self) -> DictionaryList {
        self.dictionary
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn popup(&self) -> &PopupState {
        self.popup.state()
    }

    pub fn close_popup(&mut self) {
        self.popup.close();
    }

    /// Feed a selection reported by the renderer to the popup
    pub fn select(&mut self, range: &SelectionRange, inside_popup: bool) -> Option<LookupTicket> {
        let position = match self.table.resolve(range) {
            Ok(position) => Some(position),
            Err(err) => {
                debug!(text = %range.text, "selection not tied to a word: {}", err);
                None
            }
        };
        self.popup.on_selection(SelectionInput {
            text: range.text.clone(),
            position,
            inside_popup,
        })
    }

    /// Select the single word at `position`, as a click on it would
    pub fn select_word(&mut self, position: Position) -> Option<LookupTicket> {
        let range = self.table.select_word(position)?;
        self.select(&range, false)
    }

    pub fn complete_lookup(&mut self, ticket: LookupTicket, outcome: lookup::LookupOutcome) -> bool {
        self.popup.on_lookup(ticket, outcome)
    }

    /// Run the lookup for the pending selection and apply the answer
    pub async fn look_up<A: LookupApi + ?Sized>(&mut self, api: &A, ticket: LookupTicket) -> bool {
        let Some(selection) = self.popup.state().selection() else {
            return false;
        };
        let text = selection.text.clone();
        let outcome = lookup::look_up(api, &text).await;
        self.complete_lookup(ticket, outcome)
    }

    /// Confirm the `index`-th row of the popup for the pending selection
    pub async fn confirm<A: VocabularyApi + ?Sized>(
        &mut self,
        api: &A,
        index: usize,
    ) -> Result<ConfirmOutcome, SessionError> {
        let (selection, candidate) = match self.popup.state() {
            PopupState::ShowingDefinitions { selection, result }
            | PopupState::ShowingTranslation { selection, result } => {
                match result.candidate(index) {
                    Some(candidate) => (selection.clone(), candidate),
                    None => return Ok(ConfirmOutcome::Ignored),
                }
            }
            _ => return Ok(ConfirmOutcome::Ignored),
        };

        let Some(position) = selection.position else {
            warn!(text = %selection.text, "could not determine word position");
            self.popup.could_not_save(selection.text);
            return Ok(ConfirmOutcome::PositionNotFound);
        };

        if let Placement::DuplicateElsewhere { existing } = self.store.classify(&selection.key, position)
        {
            if !selection.prompted {
                self.popup.prompt_duplicate(candidate, existing.clone());
                return Ok(ConfirmOutcome::NeedsChoice { existing });
            }
        }

        let translation = candidate.english().to_string();
        self.save(api, &selection, position, &translation, Some(&candidate))
            .await
    }

    /// Reuse the translation already given to another occurrence
    pub async fn use_existing<A: VocabularyApi + ?Sized>(
        &mut self,
        api: &A,
    ) -> Result<ConfirmOutcome, SessionError> {
        let PopupState::ShowingDuplicateChoice { selection, .. } = self.popup.state() else {
            return Ok(ConfirmOutcome::Ignored);
        };
        let selection = selection.clone();
        let Some(position) = selection.position else {
            self.popup.could_not_save(selection.text);
            return Ok(ConfirmOutcome::PositionNotFound);
        };
        let Some(existing) = self.store.first_translation(&selection.key).map(str::to_string) else {
            return Ok(ConfirmOutcome::Ignored);
        };
        self.save(api, &selection, position, &existing, None).await
    }

    /// Leave the duplicate choice and pick another definition instead
    pub fn look_up_other(&mut self) -> bool {
        self.popup.show_other_definitions()
    }

    async fn save<A: VocabularyApi + ?Sized>(
        &mut self,
        api: &A,
        selection: &PendingSelection,
        position: Position,
        translation: &str,
        candidate: Option<&Candidate>,
    ) -> Result<ConfirmOutcome, SessionError> {
        let key = selection.key.as_str();

        if let Some(user) = &self.user {
            let adapter = SyncAdapter::new(api, &user.id, &self.book_id);
            let persisted = match self.store.server_id(key, position).cloned() {
                Some(id) => adapter
                    .update(&id, translation)
                    .await
                    .map(|()| CreateOutcome::Created(id)),
                None => {
                    adapter
                        .create(&self.book, &selection.text, position, translation)
                        .await
                }
            };

            match persisted {
                Ok(CreateOutcome::Created(id)) => {
                    self.store.put_synced(key, position, translation, id);
                }
                Ok(CreateOutcome::LimitReached { vocab_count }) => {
                    self.popup.close();
                    return Ok(ConfirmOutcome::UpgradeRequired { vocab_count });
                }
                Err(err) => {
                    self.popup.set(PopupState::ShowingError {
                        selection: selection.clone(),
                        message: err.to_string(),
                    });
                    return Err(err.into());
                }
            }
        } else {
            self.store.put(key, position, translation);
        }

        if let Some(candidate) = candidate {
            self.dictionary
                .add(candidate.arabic(), translation, Some(key.to_string()));
        }
        info!(key, %position, "saved translation");
        self.popup.close();
        Ok(ConfirmOutcome::Saved {
            position,
            translation: translation.to_string(),
        })
    }

    /// Change the translation of the occurrence at `position`
    pub async fn edit<A: VocabularyApi + ?Sized>(
        &mut self,
        api: &A,
        position: Position,
        translation: &str,
    ) -> Result<(), SessionError> {
        let Some((key, annotation)) = self.store.at(position) else {
            return Err(SessionError::NoAnnotation(position));
        };
        let key = key.to_string();
        let server_id = annotation.server_id.clone();

        if let (Some(user), Some(id)) = (&self.user, server_id) {
            SyncAdapter::new(api, &user.id, &self.book_id)
                .update(&id, translation)
                .await?;
        }
        self.store.put(&key, position, translation);
        Ok(())
    }

    /// Remove the occurrence at `position`; remote first when signed in
    pub async fn delete<A: VocabularyApi + ?Sized>(
        &mut self,
        api: &A,
        position: Position,
    ) -> Result<(), SessionError> {
        let Some((key, _)) = self.store.at(position) else {
            return Err(SessionError::NoAnnotation(position));
        };
        let key = key.to_string();

        match &self.user {
            Some(user) => {
                SyncAdapter::new(api, &user.id, &self.book_id)
                    .delete(&mut self.store, &key, position)
                    .await?;
            }
            None => {
                self.store.delete(&key, position);
            }
        }
        Ok(())
    }

    /// Remove a dictionary entry together with the inline translations
    /// saved under its word
    ///
    /// The entry stays listed when a remote delete fails.
    pub async fn remove_dictionary_entry<A: VocabularyApi + ?Sized>(
        &mut self,
        api: &A,
        index: usize,
    ) -> Result<Option<DictionaryEntry>, SessionError> {
        let Some(key) = self.dictionary.get(index).map(|e| e.lookup_key().to_string()) else {
            return Ok(None);
        };
        let removed = match &self.user {
            Some(user) => {
                SyncAdapter::new(api, &user.id, &self.book_id)
                    .delete_key(&mut self.store, &key)
                    .await?
            }
            None => self.store.remove_key(&key).len(),
        };
        info!(key = %key, removed, "removed dictionary entry");
        Ok(self.dictionary.remove(index))
    }
}
