//! Word and phrase lookup: dictionary first, AI translation as fallback.

use crate::api::LookupApi;
use crate::models::Definition;
use serde::Serialize;
use tracing::{debug, warn};

/// AI translation of the selected text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AiGloss {
    pub text: String,
    pub gloss: String,
}

/// What a lookup produced
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum LookupResult {
    Dictionary { definitions: Vec<Definition> },
    Ai(AiGloss),
}

/// A row the user can pick to annotate the selection with
#[derive(Debug, Clone, PartialEq)]
pub enum Candidate {
    Dictionary(Definition),
    Ai(AiGloss),
}

impl Candidate {
    /// Arabic headword recorded in the dictionary list
    pub fn arabic(&self) -> &str {
        match self {
            Candidate::Dictionary(def) => def.display_form(),
            Candidate::Ai(gloss) => &gloss.text,
        }
    }

    /// Translation stored for the occurrence
    pub fn english(&self) -> &str {
        match self {
            Candidate::Dictionary(def) => def.gloss(),
            Candidate::Ai(gloss) => &gloss.gloss,
        }
    }
}

impl LookupResult {
    pub fn candidates(&self) -> Vec<Candidate> {
        match self {
            LookupResult::Dictionary { definitions } => definitions
                .iter()
                .cloned()
                .map(Candidate::Dictionary)
                .collect(),
            LookupResult::Ai(gloss) => vec![Candidate::Ai(gloss.clone())],
        }
    }

    pub fn candidate(&self, index: usize) -> Option<Candidate> {
        match self {
            LookupResult::Dictionary { definitions } => {
                definitions.get(index).cloned().map(Candidate::Dictionary)
            }
            LookupResult::Ai(gloss) if index == 0 => Some(Candidate::Ai(gloss.clone())),
            LookupResult::Ai(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LookupOutcome {
    Found { result: LookupResult },
    NotFound,
    Failed { message: String },
}

pub fn is_single_word(text: &str) -> bool {
    text.split_whitespace().count() == 1
}

/// Look `text` up, dispatching single words to the dictionary
pub async fn look_up<A: LookupApi + ?Sized>(api: &A, text: &str) -> LookupOutcome {
    let text = text.trim();
    if text.is_empty() {
        return LookupOutcome::NotFound;
    }

    if is_single_word(text) {
        match api.define(text).await {
            Ok(definitions) if !definitions.is_empty() => {
                debug!(word = text, count = definitions.len(), "dictionary hit");
                return LookupOutcome::Found {
                    result: LookupResult::Dictionary { definitions },
                };
            }
            Ok(_) => debug!(word = text, "no dictionary entry, falling back to AI"),
            Err(err) => warn!(word = text, "dictionary lookup failed: {}", err),
        }
    }

    match api.translate(text, is_single_word(text)).await {
        Ok(gloss) if !gloss.trim().is_empty() => LookupOutcome::Found {
            result: LookupResult::Ai(AiGloss {
                text: text.to_string(),
                gloss: gloss.trim().to_string(),
            }),
        },
        Ok(_) => LookupOutcome::NotFound,
        Err(err) => {
            warn!("AI translation failed: {}", err);
            LookupOutcome::Failed {
                message: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, ApiResult};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeLookup {
        definitions: Option<Vec<Definition>>,
        translation: Option<String>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LookupApi for FakeLookup {
        async fn define(&self, word: &str) -> ApiResult<Vec<Definition>> {
            self.calls.lock().unwrap().push(format!("define:{word}"));
            self.definitions
                .clone()
                .ok_or_else(|| ApiError::Rejected("no entry".into()))
        }

        async fn translate(&self, text: &str, single: bool) -> ApiResult<String> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("translate:{text}:{single}"));
            self.translation
                .clone()
                .ok_or_else(|| ApiError::Status {
                    status: 502,
                    message: "upstream".into(),
                })
        }
    }

    fn def(form: &str, gloss: &str) -> Definition {
        Definition {
            form: Some(form.into()),
            voc_form: None,
            nice_gloss: Some(gloss.into()),
            root: None,
        }
    }

    #[tokio::test]
    async fn test_single_word_uses_dictionary() {
        let api = FakeLookup {
            definitions: Some(vec![def("كتاب", "book")]),
            ..Default::default()
        };
        let outcome = look_up(&api, " كتاب ").await;
        let LookupOutcome::Found { result } = outcome else {
            panic!("expected a hit");
        };
        assert_eq!(result.candidates().len(), 1);
        assert_eq!(result.candidate(0).unwrap().english(), "book");
        assert_eq!(*api.calls.lock().unwrap(), vec!["define:كتاب"]);
    }

    #[tokio::test]
    async fn test_empty_definitions_fall_back_to_ai() {
        let api = FakeLookup {
            definitions: Some(vec![]),
            translation: Some("the book".into()),
            ..Default::default()
        };
        let outcome = look_up(&api, "الكتاب").await;
        assert_eq!(
            outcome,
            LookupOutcome::Found {
                result: LookupResult::Ai(AiGloss {
                    text: "الكتاب".into(),
                    gloss: "the book".into()
                })
            }
        );
        assert_eq!(api.calls.lock().unwrap()[1], "translate:الكتاب:true");
    }

    #[tokio::test]
    async fn test_phrase_goes_straight_to_ai() {
        let api = FakeLookup {
            translation: Some("the book is beautiful".into()),
            ..Default::default()
        };
        let outcome = look_up(&api, "الكتاب جميل").await;
        assert!(matches!(
            outcome,
            LookupOutcome::Found {
                result: LookupResult::Ai(_)
            }
        ));
        assert_eq!(
            *api.calls.lock().unwrap(),
            vec!["translate:الكتاب جميل:false"]
        );
    }

    #[tokio::test]
    async fn test_ai_failure_is_reported() {
        let api = FakeLookup::default();
        let outcome = look_up(&api, "كلمة").await;
        assert!(matches!(outcome, LookupOutcome::Failed { .. }));
    }

    #[tokio::test]
    async fn test_blank_ai_answer_is_not_found() {
        let api = FakeLookup {
            translation: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(look_up(&api, "a b").await, LookupOutcome::NotFound);
    }

    #[test]
    fn test_ai_candidate_accessors() {
        let result = LookupResult::Ai(AiGloss {
            text: "قال".into(),
            gloss: "he said".into(),
        });
        let c = result.candidate(0).unwrap();
        assert_eq!((c.arabic(), c.english()), ("قال", "he said"));
        assert!(result.candidate(1).is_none());
    }
}
