//! CLI command implementations.

pub mod annotate;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod dictionary;
pub mod practice;
pub mod read;
pub mod subscription;
pub mod tokenize;
pub mod vocab;

pub use annotate::{annotate, delete_annotation, edit_annotation, lookup, AnnotateOptions};
pub use auth::{login, logout, whoami};
pub use catalog::{list_books, list_categories, show_toc};
pub use config::config_get;
pub use dictionary::{delete_dictionary, edit_dictionary, list_dictionary};
pub use practice::practice;
pub use read::{list_annotations, read_page, ReadOptions};
pub use subscription::{cancel_subscription, create_subscription, subscription_status};
pub use tokenize::tokenize_file;
pub use vocab::{list_vocabulary, recent_books};
