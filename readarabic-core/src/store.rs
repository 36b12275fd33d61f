//! Positional annotation store.
//!
//! Maps a canonical word key to the exact occurrences carrying a
//! user-supplied translation. A key never maps to an empty set of positions.

use crate::tokenizer::TokenizedPage;
use readarabic_types::{Position, VocabularyId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Translation attached to one occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub translation: String,

    /// Id of the backing vocabulary record, once persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_id: Option<VocabularyId>,
}

/// How a confirmed translation relates to what is already stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Key has no annotation anywhere
    New,
    /// Key is annotated elsewhere but not at this position
    DuplicateElsewhere { existing: String },
    /// This exact occurrence is already annotated
    SameLocation { current: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationStore {
    entries: HashMap<String, BTreeMap<Position, Annotation>>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str, position: Position) -> Option<&str> {
        self.annotation(key, position)
            .map(|a| a.translation.as_str())
    }

    pub fn annotation(&self, key: &str, position: Position) -> Option<&Annotation> {
        self.entries.get(key)?.get(&position)
    }

    /// True if any occurrence of `key` carries a translation
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or overwrite; a known server id is kept
    pub fn put(&mut self, key: &str, position: Position, translation: impl Into<String>) {
        let translation = translation.into();
        let slot = self
            .entries
            .entry(key.to_string())
            .or_default()
            .entry(position)
            .or_insert_with(|| Annotation {
                translation: String::new(),
                server_id: None,
            });
        slot.translation = translation;
    }

    /// Insert or overwrite along with the backing record id
    pub fn put_synced(
        &mut self,
        key: &str,
        position: Position,
        translation: impl Into<String>,
        server_id: VocabularyId,
    ) {
        self.entries.entry(key.to_string()).or_default().insert(
            position,
            Annotation {
                translation: translation.into(),
                server_id: Some(server_id),
            },
        );
    }

    /// Remove one occurrence, pruning the key when it was the last
    pub fn delete(&mut self, key: &str, position: Position) -> Option<Annotation> {
        let positions = self.entries.get_mut(key)?;
        let removed = positions.remove(&position);
        if positions.is_empty() {
            self.entries.remove(key);
        }
        removed
    }

    /// Remove every occurrence of `key`, returning them in reading order
    pub fn remove_key(&mut self, key: &str) -> Vec<(Position, Annotation)> {
        self.entries
            .remove(key)
            .map(|positions| positions.into_iter().collect())
            .unwrap_or_default()
    }

    /// Translation of the earliest annotated occurrence in reading order
    pub fn first_translation(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)?
            .values()
            .next()
            .map(|a| a.translation.as_str())
    }

    pub fn classify(&self, key: &str, position: Position) -> Placement {
        if let Some(current) = self.get(key, position) {
            return Placement::SameLocation {
                current: current.to_string(),
            };
        }
        match self.first_translation(key) {
            Some(existing) => Placement::DuplicateElsewhere {
                existing: existing.to_string(),
            },
            None => Placement::New,
        }
    }

    pub fn server_id(&self, key: &str, position: Position) -> Option<&VocabularyId> {
        self.annotation(key, position)?.server_id.as_ref()
    }

    /// Record the backing id for an existing entry; returns false if absent
    pub fn set_server_id(&mut self, key: &str, position: Position, id: VocabularyId) -> bool {
        match self
            .entries
            .get_mut(key)
            .and_then(|positions| positions.get_mut(&position))
        {
            Some(annotation) => {
                annotation.server_id = Some(id);
                true
            }
            None => false,
        }
    }

    /// Positions annotated for `key`, in reading order
    pub fn positions(&self, key: &str) -> Vec<Position> {
        self.entries
            .get(key)
            .map(|p| p.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Annotation at a position, whatever its key
    pub fn at(&self, position: Position) -> Option<(&str, &Annotation)> {
        self.entries.iter().find_map(|(key, positions)| {
            positions.get(&position).map(|a| (key.as_str(), a))
        })
    }

    /// Every annotation, sorted by position
    pub fn iter(&self) -> Vec<(&str, Position, &Annotation)> {
        let mut all: Vec<_> = self
            .entries
            .iter()
            .flat_map(|(key, positions)| {
                positions
                    .iter()
                    .map(move |(pos, a)| (key.as_str(), *pos, a))
            })
            .collect();
        all.sort_by_key(|(_, pos, _)| *pos);
        all
    }

    /// Number of annotated occurrences
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Spread a flat key → translation map over every matching occurrence
    ///
    /// Occurrences that already carry a translation are left alone. Returns
    /// the number of entries added.
    pub fn merge_legacy(
        &mut self,
        legacy: &HashMap<String, String>,
        pages: &[TokenizedPage],
    ) -> usize {
        let mut added = 0;
        for token in pages.iter().flat_map(TokenizedPage::tokens) {
            let Some(translation) = legacy.get(&token.key) else {
                continue;
            };
            if self.get(&token.key, token.position).is_none() {
                self.put(&token.key, token.position, translation.clone());
                added += 1;
            }
        }
        added
    }
}
