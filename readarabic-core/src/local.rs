//! Local state kept in the data directory.
//!
//! - `session.json`: signed-in user
//! - `dictionary.json`: the dictionary list
//! - `inline-translations.json`: flat key → translation map from older
//!   versions, only ever read
//! - `annotations/<book>.json`: positional store for signed-out reading

use crate::dictionary::DictionaryList;
use crate::models::User;
use crate::store::AnnotationStore;
use chrono::Utc;
use readarabic_types::BookId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

const SESSION_FILE: &str = "session.json";
const DICTIONARY_FILE: &str = "dictionary.json";
const LEGACY_TRANSLATIONS_FILE: &str = "inline-translations.json";
const ANNOTATIONS_DIR: &str = "annotations";

#[derive(Error, Debug)]
pub enum LocalStoreError {
    #[error("Failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize local state: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize)]
struct SavedSession {
    saved_at: String,
    user: User,
}

#[derive(Debug, Clone)]
pub struct LocalState {
    dir: PathBuf,
}

impl LocalState {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn annotations_path(&self, book: &BookId) -> PathBuf {
        self.dir
            .join(ANNOTATIONS_DIR)
            .join(format!("{}.json", file_stem(book.as_str())))
    }

    pub fn load_user(&self) -> Result<Option<User>, LocalStoreError> {
        Ok(read_json::<SavedSession>(&self.path(SESSION_FILE))?.map(|s| s.user))
    }

    pub fn save_user(&self, user: &User) -> Result<(), LocalStoreError> {
        let saved = SavedSession {
            saved_at: Utc::now().to_rfc3339(),
            user: user.clone(),
        };
        write_json(&self.path(SESSION_FILE), &saved)
    }

    /// Forget the signed-in user; returns false if nobody was signed in
    pub fn clear_user(&self) -> Result<bool, LocalStoreError> {
        let path = self.path(SESSION_FILE);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(LocalStoreError::Io { path, source }),
        }
    }

    pub fn load_dictionary(&self) -> Result<DictionaryList, LocalStoreError> {
        Ok(read_json(&self.path(DICTIONARY_FILE))?.unwrap_or_default())
    }

    pub fn save_dictionary(&self, dictionary: &DictionaryList) -> Result<(), LocalStoreError> {
        write_json(&self.path(DICTIONARY_FILE), dictionary)
    }

    /// Flat translations written by older clients
    ///
    /// Entries whose value is not a plain string (the later positional
    /// format) are ignored.
    pub fn load_legacy_translations(&self) -> Result<HashMap<String, String>, LocalStoreError> {
        let raw: Option<HashMap<String, serde_json::Value>> =
            read_json(&self.path(LEGACY_TRANSLATIONS_FILE))?;
        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(key, value)| match value {
                serde_json::Value::String(s) => Some((key, s)),
                _ => None,
            })
            .collect())
    }

    /// True once signed-out annotations were saved for `book`
    pub fn has_annotations(&self, book: &BookId) -> bool {
        self.annotations_path(book).exists()
    }

    pub fn load_annotations(&self, book: &BookId) -> Result<AnnotationStore, LocalStoreError> {
        Ok(read_json(&self.annotations_path(book))?.unwrap_or_default())
    }

    pub fn save_annotations(
        &self,
        book: &BookId,
        store: &AnnotationStore,
    ) -> Result<(), LocalStoreError> {
        write_json(&self.annotations_path(book), store)
    }

    /// Drop `key` from every saved book, returning the occurrences removed
    pub fn remove_annotation_key(&self, key: &str) -> Result<usize, LocalStoreError> {
        let dir = self.dir.join(ANNOTATIONS_DIR);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(source) => return Err(LocalStoreError::Io { path: dir, source }),
        };

        let mut removed = 0;
        for entry in entries {
            let path = entry
                .map_err(|source| LocalStoreError::Io {
                    path: dir.clone(),
                    source,
                })?
                .path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(mut store) = read_json::<AnnotationStore>(&path)? else {
                continue;
            };
            let dropped = store.remove_key(key).len();
            if dropped > 0 {
                write_json(&path, &store)?;
                removed += dropped;
            }
        }
        debug!(key, removed, "removed key from saved annotations");
        Ok(removed)
    }
}

/// Keep ids usable as file names
fn file_stem(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, LocalStoreError> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(LocalStoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_slice(&data)
        .map(Some)
        .map_err(|source| LocalStoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), LocalStoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| LocalStoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_vec_pretty(value)?;
    fs::write(path, json).map_err(|source| {
        warn!(path = %path.display(), "failed to write local state");
        LocalStoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;
    debug!(path = %path.display(), "wrote local state");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use readarabic_types::{Position, UserId};

    fn user() -> User {
        User {
            id: UserId::new("42"),
            email: Some("a@example.com".into()),
            name: Some("A".into()),
            picture: None,
        }
    }

    #[test]
    fn test_missing_files_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let local = LocalState::new(dir.path());
        assert!(local.load_user().unwrap().is_none());
        assert!(local.load_dictionary().unwrap().is_empty());
        assert!(local.load_legacy_translations().unwrap().is_empty());
        assert!(local.load_annotations(&BookId::new("1")).unwrap().is_empty());
    }

    #[test]
    fn test_session_save_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let local = LocalState::new(dir.path().join("nested"));
        local.save_user(&user()).unwrap();
        assert_eq!(local.load_user().unwrap(), Some(user()));

        assert!(local.clear_user().unwrap());
        assert!(!local.clear_user().unwrap());
        assert!(local.load_user().unwrap().is_none());
    }

    #[test]
    fn test_dictionary_file_uses_selected_word_field() {
        let dir = tempfile::tempdir().unwrap();
        let local = LocalState::new(dir.path());
        let mut dict = DictionaryList::new();
        dict.add("كِتَاب", "book", Some("كتاب".into()));
        local.save_dictionary(&dict).unwrap();

        let raw = fs::read_to_string(dir.path().join(DICTIONARY_FILE)).unwrap();
        assert!(raw.contains("\"selectedWord\""));
        assert_eq!(local.load_dictionary().unwrap(), dict);
    }

    #[test]
    fn test_legacy_translations_skip_nested_values() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(LEGACY_TRANSLATIONS_FILE),
            r#"{"كتاب": "book", "قلم": {"0-1": "pen"}}"#,
        )
        .unwrap();
        let legacy = LocalState::new(dir.path()).load_legacy_translations().unwrap();
        assert_eq!(legacy.len(), 1);
        assert_eq!(legacy["كتاب"], "book");
    }

    #[test]
    fn test_annotations_per_book() {
        let dir = tempfile::tempdir().unwrap();
        let local = LocalState::new(dir.path());
        let mut store = AnnotationStore::new();
        store.put("كتاب", Position::new(0, 5), "book");
        local.save_annotations(&BookId::new("7/x"), &store).unwrap();

        assert!(dir.path().join("annotations/7_x.json").exists());
        assert!(local.has_annotations(&BookId::new("7/x")));
        assert_eq!(local.load_annotations(&BookId::new("7/x")).unwrap(), store);
        assert!(local.load_annotations(&BookId::new("8")).unwrap().is_empty());
    }

    #[test]
    fn test_remove_annotation_key_across_books() {
        let dir = tempfile::tempdir().unwrap();
        let local = LocalState::new(dir.path());
        assert_eq!(local.remove_annotation_key("كتاب").unwrap(), 0);

        let mut first = AnnotationStore::new();
        first.put("كتاب", Position::new(0, 0), "book");
        first.put("قلم", Position::new(0, 1), "pen");
        let mut second = AnnotationStore::new();
        second.put("كتاب", Position::new(3, 2), "book");
        second.put("كتاب", Position::new(4, 0), "book");
        local.save_annotations(&BookId::new("1"), &first).unwrap();
        local.save_annotations(&BookId::new("2"), &second).unwrap();

        assert_eq!(local.remove_annotation_key("كتاب").unwrap(), 3);
        let first = local.load_annotations(&BookId::new("1")).unwrap();
        assert!(!first.has("كتاب"));
        assert_eq!(first.get("قلم", Position::new(0, 1)), Some("pen"));
        assert!(local.load_annotations(&BookId::new("2")).unwrap().is_empty());
        assert!(local.has_annotations(&BookId::new("2")));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(DICTIONARY_FILE), "not json").unwrap();
        let err = LocalState::new(dir.path()).load_dictionary().unwrap_err();
        assert!(matches!(err, LocalStoreError::Parse { .. }));
    }
}
