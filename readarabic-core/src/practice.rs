//! Flashcard review of due vocabulary.
//!
//! Scheduling lives on the server; a session only flips cards, counts
//! answers and reports each pass/fail.

use crate::api::{ApiResult, VocabularyApi};
use crate::models::VocabularyRecord;
use rand::seq::SliceRandom;
use rand::Rng;
use readarabic_types::{BookId, UserId, VocabularyId};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PracticeStats {
    pub correct: usize,
    pub incorrect: usize,
    pub total: usize,
}

impl PracticeStats {
    /// Percentage of correct answers over all cards, rounded
    pub fn accuracy(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.correct as f64 / self.total as f64 * 100.0).round() as u32
    }
}

/// Input mapped from a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeAction {
    Flip,
    Answer(bool),
}

impl PracticeAction {
    /// Space flips a face-down card; `1`/`2` grade a flipped one
    pub fn from_key(key: char, flipped: bool) -> Option<Self> {
        match (key, flipped) {
            (' ', false) => Some(PracticeAction::Flip),
            ('1', true) => Some(PracticeAction::Answer(true)),
            ('2', true) => Some(PracticeAction::Answer(false)),
            _ => None,
        }
    }
}

/// Review to report after an answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: VocabularyId,
    pub correct: bool,
}

#[derive(Debug, Clone)]
pub struct PracticeSession {
    cards: Vec<VocabularyRecord>,
    current: usize,
    flipped: bool,
    stats: PracticeStats,
    complete: bool,
}

impl PracticeSession {
    /// Cards in the given order
    pub fn new(cards: Vec<VocabularyRecord>) -> Self {
        let stats = PracticeStats {
            total: cards.len(),
            ..PracticeStats::default()
        };
        Self {
            complete: cards.is_empty(),
            cards,
            current: 0,
            flipped: false,
            stats,
        }
    }

    pub fn shuffled<R: Rng + ?Sized>(mut cards: Vec<VocabularyRecord>, rng: &mut R) -> Self {
        cards.shuffle(rng);
        Self::new(cards)
    }

    /// Fetch the cards due for `user`, optionally for one book
    pub async fn start<A: VocabularyApi + ?Sized>(
        api: &A,
        user: &UserId,
        book: Option<&BookId>,
    ) -> ApiResult<Self> {
        let cards = api.due(user, book).await?;
        info!(user = %user, due = cards.len(), "starting practice");
        Ok(Self::shuffled(cards, &mut rand::rng()))
    }

    pub fn current(&self) -> Option<&VocabularyRecord> {
        if self.complete {
            return None;
        }
        self.cards.get(self.current)
    }

    /// 1-based number of the current card
    pub fn card_number(&self) -> usize {
        (self.current + 1).min(self.cards.len())
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn stats(&self) -> PracticeStats {
        self.stats
    }

    pub fn flip(&mut self) {
        if !self.complete {
            self.flipped = !self.flipped;
        }
    }

    /// Grade the current card and advance; ignored until it is flipped
    pub fn answer(&mut self, correct: bool) -> Option<Review> {
        if !self.flipped {
            return None;
        }
        let card = self.current()?;
        let review = Review {
            id: card.id.clone(),
            correct,
        };

        if correct {
            self.stats.correct += 1;
        } else {
            self.stats.incorrect += 1;
        }
        self.flipped = false;
        if self.current + 1 < self.cards.len() {
            self.current += 1;
        } else {
            self.complete = true;
        }
        Some(review)
    }

    /// Apply a key press; returns the review to report, if any
    pub fn handle_key(&mut self, key: char) -> Option<Review> {
        match PracticeAction::from_key(key, self.flipped)? {
            PracticeAction::Flip => {
                self.flip();
                None
            }
            PracticeAction::Answer(correct) => self.answer(correct),
        }
    }

    /// Grade the current card and post the review
    ///
    /// A failed post is logged; the session has already advanced.
    pub async fn answer_and_report<A: VocabularyApi + ?Sized>(
        &mut self,
        api: &A,
        correct: bool,
    ) -> Option<Review> {
        let review = self.answer(correct)?;
        report(api, &review).await;
        Some(review)
    }
}

pub async fn report<A: VocabularyApi + ?Sized>(api: &A, review: &Review) {
    if let Err(err) = api.review(&review.id, review.correct).await {
        warn!(id = %review.id, "failed to update review: {}", err);
    }
}
