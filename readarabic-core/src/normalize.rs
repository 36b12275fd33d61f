//! Canonical lookup keys for Arabic word tokens.

/// Punctuation removed from tokens before lookup
const STRIPPED_PUNCTUATION: &[char] = &[
    '،', '؛', '؟', '.', '!', ':', '(', ')', '[', ']', '{', '}', '«', '»', '"', '\'', '“', '”',
    '‘', '’',
];

/// Arabic combining marks (tashkeel) plus the superscript alef
pub fn is_diacritic(c: char) -> bool {
    matches!(c, '\u{064B}'..='\u{065F}' | '\u{0670}')
}

pub fn is_stripped_punctuation(c: char) -> bool {
    STRIPPED_PUNCTUATION.contains(&c)
}

/// Convert a raw token into its canonical lookup key
///
/// Rules:
/// - Remove Arabic diacritics (U+064B–U+065F, U+0670)
/// - Remove sentence punctuation, brackets and quotation marks
/// - Trim surrounding whitespace
///
/// The same key must be produced for selected text, rendered tokens and
/// stored vocabulary words, otherwise annotations fail to match.
///
/// # Examples
///
/// ```
/// use readarabic_core::normalize;
///
/// assert_eq!(normalize("الْكِتَابُ"), "الكتاب");
/// assert_eq!(normalize("«جميل»،"), "جميل");
/// ```
pub fn normalize(raw: &str) -> String {
    let stripped: String = raw
        .chars()
        .filter(|&c| !is_diacritic(c) && !is_stripped_punctuation(c))
        .collect();
    stripped.trim().to_string()
}

/// Whether two raw strings resolve to the same key
pub fn same_key(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}
