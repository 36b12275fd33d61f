//! "My dictionary" word list.
//!
//! Not position aware; one row per distinct (arabic, english) pair.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub arabic: String,
    pub english: String,

    /// Canonical key of the word the user selected
    #[serde(rename = "selectedWord", default)]
    pub selected_word: Option<String>,
}

impl DictionaryEntry {
    /// Key the entry was saved under
    pub fn lookup_key(&self) -> &str {
        self.selected_word.as_deref().unwrap_or(&self.arabic)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DictionaryList {
    entries: Vec<DictionaryEntry>,
}

impl DictionaryList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append unless the exact (arabic, english) pair is already listed
    pub fn add(
        &mut self,
        arabic: impl Into<String>,
        english: impl Into<String>,
        selected_word: Option<String>,
    ) -> bool {
        let arabic = arabic.into();
        let english = english.into();
        if self.contains(&arabic, &english) {
            return false;
        }
        self.entries.push(DictionaryEntry {
            arabic,
            english,
            selected_word,
        });
        true
    }

    pub fn contains(&self, arabic: &str, english: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.arabic == arabic && e.english == english)
    }

    /// Replace the gloss at `index`, returning the previous entry
    pub fn edit(&mut self, index: usize, english: impl Into<String>) -> Option<DictionaryEntry> {
        let entry = self.entries.get_mut(index)?;
        let previous = entry.clone();
        entry.english = english.into();
        Some(previous)
    }

    pub fn remove(&mut self, index: usize) -> Option<DictionaryEntry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    pub fn get(&self, index: usize) -> Option<&DictionaryEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
