//! # readarabic-core
//!
//! Core library for the ReadArabic reader.
//!
//! This crate tokenizes book pages into positioned words, keeps per-occurrence
//! translations, drives the lookup popup and reconciles everything with the
//! remote vocabulary API through the traits in [`api`].

pub mod api;
pub mod config;
pub mod dictionary;
pub mod local;
pub mod lookup;
pub mod models;
pub mod normalize;
pub mod popup;
pub mod practice;
pub mod render;
pub mod selection;
pub mod session;
pub mod store;
pub mod sync;
#[cfg(test)]
pub(crate) mod testing;
pub mod tokenizer;

pub use api::{ApiError, ApiResult, ReaderApi};
pub use config::Config;
pub use dictionary::{DictionaryEntry, DictionaryList};
pub use local::{LocalState, LocalStoreError};
pub use lookup::{look_up, Candidate, LookupOutcome, LookupResult};
pub use models::{Book, BookSummary, Category, Definition, User, VocabularyRecord};
pub use normalize::normalize;
pub use popup::{Popup, PopupState};
pub use practice::PracticeSession;
pub use selection::{RenderTable, SelectionRange};
pub use session::{ConfirmOutcome, ReaderSession, SessionError};
pub use store::AnnotationStore;
pub use sync::{SyncAdapter, SyncError};
pub use tokenizer::{tokenize_page, TokenizedPage};
