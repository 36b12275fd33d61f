//! Page tokenizer: positioned word tokens plus inline headings.
//!
//! Page text may embed heading markup of the form
//! `<span data-type="title" id=ID>[TITLE]</span>`. Headings are rendered as a
//! single unit and never consume word slots, so word indices stay contiguous
//! across the plain-text runs of a page.

use crate::normalize::normalize;
use once_cell::sync::Lazy;
use readarabic_types::Position;
use regex::Regex;
use serde::Serialize;

static TITLE_SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<span[^>]*data-type=["']title["'][^>]*id=([^\s>]+)[^>]*>(.+?)</span>"#)
        .expect("title span pattern is valid")
});

/// A word occurrence on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Text as it appears on the page, diacritics and punctuation included
    pub raw: String,
    /// Canonical lookup key
    pub key: String,
    pub position: Position,
}

/// Heading extracted from page markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineHeading {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Words { tokens: Vec<Token> },
    Heading(InlineHeading),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenizedPage {
    pub page_index: usize,
    pub segments: Vec<Segment>,
}

impl TokenizedPage {
    /// All word tokens in reading order
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.segments.iter().flat_map(|segment| match segment {
            Segment::Words { tokens } => tokens.as_slice(),
            Segment::Heading(_) => &[],
        })
    }

    pub fn headings(&self) -> impl Iterator<Item = &InlineHeading> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Heading(heading) => Some(heading),
            Segment::Words { .. } => None,
        })
    }

    pub fn word_count(&self) -> usize {
        self.tokens().count()
    }

    /// Token at a given word index
    pub fn token(&self, word: usize) -> Option<&Token> {
        self.tokens().nth(word)
    }
}

/// Split a page's text into segments with stable word coordinates
pub fn tokenize_page(page_index: usize, text: &str) -> TokenizedPage {
    let mut segments = Vec::new();
    let mut counter = 0usize;
    let mut last = 0usize;

    for caps in TITLE_SPAN.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            push_words(&mut segments, page_index, &text[last..whole.start()], &mut counter);
        }

        let id = caps[1].trim_matches(|c| c == '"' || c == '\'').to_string();
        let title = strip_brackets(&caps[2]).to_string();
        segments.push(Segment::Heading(InlineHeading { id, title }));

        last = whole.end();
    }

    if last < text.len() {
        push_words(&mut segments, page_index, &text[last..], &mut counter);
    }

    tracing::debug!(page_index, words = counter, "tokenized page");
    TokenizedPage {
        page_index,
        segments,
    }
}

fn push_words(segments: &mut Vec<Segment>, page: usize, text: &str, counter: &mut usize) {
    let tokens: Vec<Token> = text
        .split(' ')
        .filter(|word| !word.trim().is_empty())
        .map(|word| {
            let token = Token {
                raw: word.to_string(),
                key: normalize(word),
                position: Position::new(page, *counter),
            };
            *counter += 1;
            token
        })
        .collect();

    if !tokens.is_empty() {
        segments.push(Segment::Words { tokens });
    }
}

fn strip_brackets(title: &str) -> &str {
    let title = title.strip_prefix('[').unwrap_or(title);
    title.strip_suffix(']').unwrap_or(title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn words(page: &TokenizedPage) -> Vec<(&str, usize)> {
        page.tokens()
            .map(|t| (t.raw.as_str(), t.position.word))
            .collect()
    }

    #[test]
    fn test_plain_page() {
        let page = tokenize_page(0, "الكتاب جميل");
        assert_eq!(words(&page), vec![("الكتاب", 0), ("جميل", 1)]);
        assert_eq!(page.token(0).unwrap().key, "الكتاب");
        assert_eq!(page.token(1).unwrap().position, Position::new(0, 1));
    }

    #[test]
    fn test_consecutive_spaces_do_not_consume_slots() {
        let page = tokenize_page(3, "  قال   الشيخ ");
        assert_eq!(words(&page), vec![("قال", 0), ("الشيخ", 1)]);
        assert!(page.tokens().all(|t| t.position.page == 3));
    }

    #[test]
    fn test_heading_is_extracted() {
        let text = r#"مقدمة <span data-type="title" id=toc-1>[باب الطهارة]</span> قال المصنف"#;
        let page = tokenize_page(0, text);

        let headings: Vec<_> = page.headings().collect();
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].id, "toc-1");
        assert_eq!(headings[0].title, "باب الطهارة");

        assert_eq!(words(&page), vec![("مقدمة", 0), ("قال", 1), ("المصنف", 2)]);
        assert!(matches!(page.segments[1], Segment::Heading(_)));
    }

    #[test]
    fn test_quoted_id_and_single_quotes() {
        let text = r#"<span class='t' data-type='title' id="h2">فصل</span>نص"#;
        let page = tokenize_page(1, text);
        let heading = page.headings().next().unwrap();
        assert_eq!(heading.id, "h2");
        assert_eq!(heading.title, "فصل");
        assert_eq!(words(&page), vec![("نص", 0)]);
    }

    #[test]
    fn test_multiple_headings_keep_counter_running() {
        let text = concat!(
            "أ ب ",
            r#"<span data-type="title" id=1>الأول</span>"#,
            " ج ",
            r#"<span data-type="title" id=2>الثاني</span>"#,
            "د"
        );
        let page = tokenize_page(0, text);
        assert_eq!(
            words(&page),
            vec![("أ", 0), ("ب", 1), ("ج", 2), ("د", 3)]
        );
        assert_eq!(page.headings().count(), 2);
    }

    #[test]
    fn test_token_keeps_raw_but_keys_normalized() {
        let page = tokenize_page(0, "«الْعِلْمُ»، نور");
        let first = page.token(0).unwrap();
        assert_eq!(first.raw, "«الْعِلْمُ»،");
        assert_eq!(first.key, "العلم");
    }

    #[test]
    fn test_empty_page() {
        let page = tokenize_page(0, "");
        assert!(page.segments.is_empty());
        assert_eq!(page.word_count(), 0);
    }

    proptest! {
        #[test]
        fn word_indices_are_contiguous(
            runs in proptest::collection::vec("[ا-ي ]{0,30}", 1..5),
        ) {
            let text = runs.join(r#"<span data-type="title" id=x>عنوان</span>"#);
            let page = tokenize_page(0, &text);
            let indices: Vec<usize> = page.tokens().map(|t| t.position.word).collect();
            let expected: Vec<usize> = (0..indices.len()).collect();
            prop_assert_eq!(indices, expected);
        }
    }
}
