//! Plain-text page rendering with inline glosses.

use crate::store::AnnotationStore;
use crate::tokenizer::{Segment, TokenizedPage};

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Suffix every word with its word index, e.g. `كتاب#5`
    pub show_positions: bool,
    /// Hide the inline translations
    pub hide_glosses: bool,
}

/// Render one page: headings on their own line, annotated words followed by
/// their translation in square brackets
pub fn render_page(page: &TokenizedPage, store: &AnnotationStore, options: RenderOptions) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut line: Vec<String> = Vec::new();

    for segment in &page.segments {
        match segment {
            Segment::Heading(heading) => {
                if !line.is_empty() {
                    lines.push(line.join(" "));
                    line.clear();
                }
                lines.push(format!("## {}", heading.title));
            }
            Segment::Words { tokens } => {
                for token in tokens {
                    let mut word = token.raw.clone();
                    if options.show_positions {
                        word.push_str(&format!("#{}", token.position.word));
                    }
                    if !options.hide_glosses {
                        if let Some(translation) = store.get(&token.key, token.position) {
                            word.push_str(&format!(" [{translation}]"));
                        }
                    }
                    line.push(word);
                }
            }
        }
    }
    if !line.is_empty() {
        lines.push(line.join(" "));
    }
    lines.join("\n")
}
