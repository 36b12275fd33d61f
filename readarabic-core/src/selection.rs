//! Selection resolution against a render-time coordinate table.
//!
//! The renderer registers one node per word wrapper while it lays a page
//! out. A selection reports the nodes at its boundaries; resolving it is a
//! table lookup plus a check that the wrapper's key equals the selected key.

use crate::normalize::normalize;
use crate::tokenizer::TokenizedPage;
use readarabic_types::Position;
use std::collections::HashMap;
use thiserror::Error;

/// Handle of a rendered word wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrapper {
    pub position: Position,
    pub raw: String,
    pub key: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("selection is empty")]
    Empty,

    #[error("could not find the selected word on the page")]
    PositionNotFound,
}

/// A live text selection as reported by the rendering layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRange {
    pub text: String,
    /// Wrapper containing the selection start, if any
    pub start: Option<NodeId>,
    /// Wrapper containing the selection end, if any
    pub end: Option<NodeId>,
}

impl SelectionRange {
    pub fn new(text: impl Into<String>, start: Option<NodeId>, end: Option<NodeId>) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderTable {
    wrappers: Vec<Wrapper>,
    by_position: HashMap<Position, NodeId>,
}

impl RenderTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every word of the given pages, in order
    pub fn from_pages(pages: &[TokenizedPage]) -> Self {
        let mut table = Self::new();
        for token in pages.iter().flat_map(TokenizedPage::tokens) {
            table.register(token.position, &token.raw);
        }
        table
    }

    pub fn register(&mut self, position: Position, raw: &str) -> NodeId {
        if let Some(&node) = self.by_position.get(&position) {
            return node;
        }
        let node = NodeId(self.wrappers.len());
        self.wrappers.push(Wrapper {
            position,
            raw: raw.to_string(),
            key: normalize(raw),
        });
        self.by_position.insert(position, node);
        node
    }

    pub fn wrapper(&self, node: NodeId) -> Option<&Wrapper> {
        self.wrappers.get(node.0)
    }

    pub fn node_at(&self, position: Position) -> Option<NodeId> {
        self.by_position.get(&position).copied()
    }

    pub fn len(&self) -> usize {
        self.wrappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wrappers.is_empty()
    }

    /// Selection covering exactly one word, as a click on it would produce
    pub fn select_word(&self, position: Position) -> Option<SelectionRange> {
        let node = self.node_at(position)?;
        let wrapper = self.wrapper(node)?;
        Some(SelectionRange::new(wrapper.raw.clone(), Some(node), Some(node)))
    }

    /// Find the exact occurrence a selection refers to
    pub fn resolve(&self, selection: &SelectionRange) -> Result<Position, SelectionError> {
        let key = normalize(&selection.text);
        if key.is_empty() {
            return Err(SelectionError::Empty);
        }

        [selection.start, selection.end]
            .into_iter()
            .flatten()
            .filter_map(|node| self.wrapper(node))
            .find(|w| w.key == key)
            .map(|w| w.position)
            .ok_or(SelectionError::PositionNotFound)
    }
}
