//! Translation popup state machine.
//!
//! ```text
//! Idle -> Selecting -> LookingUp -> { ShowingDefinitions | ShowingTranslation
//!                                   | ShowingDuplicateChoice | ShowingNotFound
//!                                   | ShowingError } -> Idle
//! ```
//!
//! Every lookup is tagged with a sequence number; a response is applied only
//! if no newer lookup has been started since.

use crate::lookup::{Candidate, LookupOutcome, LookupResult};
use crate::normalize::normalize;
use readarabic_types::Position;
use tracing::debug;

/// Selection awaiting a translation
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSelection {
    pub text: String,
    pub key: String,
    /// `None` when the selection could not be mapped to one word
    pub position: Option<Position>,
    /// Duplicate choice already shown for this selection
    pub prompted: bool,
}

impl PendingSelection {
    pub fn new(text: &str, position: Option<Position>) -> Self {
        let text = text.trim().to_string();
        Self {
            key: normalize(&text),
            text,
            position,
            prompted: false,
        }
    }
}

/// Ticket for an in-flight lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LookupTicket(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum PopupState {
    Idle,
    Selecting {
        selection: PendingSelection,
    },
    LookingUp {
        selection: PendingSelection,
        ticket: LookupTicket,
    },
    ShowingDefinitions {
        selection: PendingSelection,
        result: LookupResult,
    },
    ShowingTranslation {
        selection: PendingSelection,
        result: LookupResult,
    },
    ShowingDuplicateChoice {
        selection: PendingSelection,
        result: LookupResult,
        candidate: Candidate,
        existing: String,
    },
    ShowingNotFound {
        selection: PendingSelection,
    },
    ShowingError {
        selection: PendingSelection,
        message: String,
    },
    /// Dismissible "could not save" notice
    CouldNotSave {
        text: String,
    },
}

impl PopupState {
    pub fn name(&self) -> &'static str {
        match self {
            PopupState::Idle => "idle",
            PopupState::Selecting { .. } => "selecting",
            PopupState::LookingUp { .. } => "looking_up",
            PopupState::ShowingDefinitions { .. } => "showing_definitions",
            PopupState::ShowingTranslation { .. } => "showing_translation",
            PopupState::ShowingDuplicateChoice { .. } => "showing_duplicate_choice",
            PopupState::ShowingNotFound { .. } => "showing_not_found",
            PopupState::ShowingError { .. } => "showing_error",
            PopupState::CouldNotSave { .. } => "could_not_save",
        }
    }

    pub fn selection(&self) -> Option<&PendingSelection> {
        match self {
            PopupState::Selecting { selection }
            | PopupState::LookingUp { selection, .. }
            | PopupState::ShowingDefinitions { selection, .. }
            | PopupState::ShowingTranslation { selection, .. }
            | PopupState::ShowingDuplicateChoice { selection, .. }
            | PopupState::ShowingNotFound { selection }
            | PopupState::ShowingError { selection, .. } => Some(selection),
            PopupState::Idle | PopupState::CouldNotSave { .. } => None,
        }
    }

    /// Result currently on screen that rows can be picked from
    pub fn result(&self) -> Option<&LookupResult> {
        match self {
            PopupState::ShowingDefinitions { result, .. }
            | PopupState::ShowingTranslation { result, .. }
            | PopupState::ShowingDuplicateChoice { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, PopupState::Idle)
    }
}

/// Pointer/selection input delivered to the popup
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionInput {
    pub text: String,
    pub position: Option<Position>,
    /// The pointer was released inside the popup itself
    pub inside_popup: bool,
}

#[derive(Debug)]
pub struct Popup {
    state: PopupState,
    next_ticket: u64,
}

impl Default for Popup {
    fn default() -> Self {
        Self::new()
    }
}

impl Popup {
    pub fn new() -> Self {
        Self {
            state: PopupState::Idle,
            next_ticket: 0,
        }
    }

    pub fn state(&self) -> &PopupState {
        &self.state
    }

    pub fn set(&mut self, state: PopupState) {
        debug!(from = self.state.name(), to = state.name(), "popup transition");
        self.state = state;
    }

    pub fn close(&mut self) {
        self.set(PopupState::Idle);
    }

    /// Handle a pointer release; returns a ticket when a lookup should start
    pub fn on_selection(&mut self, input: SelectionInput) -> Option<LookupTicket> {
        if input.inside_popup && self.state.is_visible() {
            return None;
        }

        let text = input.text.trim();
        if text.is_empty() {
            self.close();
            return None;
        }

        let selection = PendingSelection::new(text, input.position);
        self.set(PopupState::Selecting {
            selection: selection.clone(),
        });

        self.next_ticket += 1;
        let ticket = LookupTicket(self.next_ticket);
        self.set(PopupState::LookingUp { selection, ticket });
        Some(ticket)
    }

    /// Apply a lookup response; stale responses are dropped
    pub fn on_lookup(&mut self, ticket: LookupTicket, outcome: LookupOutcome) -> bool {
        let selection = match &self.state {
            PopupState::LookingUp {
                selection,
                ticket: current,
            } if *current == ticket => selection.clone(),
            _ => {
                debug!(ticket = ticket.0, "discarding stale lookup response");
                return false;
            }
        };

        let next = match outcome {
            LookupOutcome::Found {
                result: result @ LookupResult::Dictionary { .. },
            } => PopupState::ShowingDefinitions { selection, result },
            LookupOutcome::Found {
                result: result @ LookupResult::Ai(_),
            } => PopupState::ShowingTranslation { selection, result },
            LookupOutcome::NotFound => PopupState::ShowingNotFound { selection },
            LookupOutcome::Failed { message } => PopupState::ShowingError { selection, message },
        };
        self.set(next);
        true
    }

    /// Move to the duplicate choice, marking the selection as prompted
    pub fn prompt_duplicate(&mut self, candidate: Candidate, existing: String) -> bool {
        let (selection, result) = match &self.state {
            PopupState::ShowingDefinitions { selection, result }
            | PopupState::ShowingTranslation { selection, result } => {
                (selection.clone(), result.clone())
            }
            _ => return false,
        };
        let selection = PendingSelection {
            prompted: true,
            ..selection
        };
        self.set(PopupState::ShowingDuplicateChoice {
            selection,
            result,
            candidate,
            existing,
        });
        true
    }

    /// "Look up other definitions": back to the rows, prompt already spent
    pub fn show_other_definitions(&mut self) -> bool {
        let PopupState::ShowingDuplicateChoice {
            selection, result, ..
        } = &self.state
        else {
            return false;
        };
        let next = match result {
            LookupResult::Dictionary { .. } => PopupState::ShowingDefinitions {
                selection: selection.clone(),
                result: result.clone(),
            },
            LookupResult::Ai(_) => PopupState::ShowingTranslation {
                selection: selection.clone(),
                result: result.clone(),
            },
        };
        self.set(next);
        true
    }

    pub fn could_not_save(&mut self, text: impl Into<String>) {
        self.set(PopupState::CouldNotSave { text: text.into() });
    }
}
