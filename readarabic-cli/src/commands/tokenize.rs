use crate::output::{self, TokenRow};
use anyhow::{Context, Result};
use readarabic_core::tokenizer::{tokenize_page, Segment};
use std::fs;
use std::path::Path;

/// Tokenize a text file as page 0
pub fn tokenize_file(path: &Path, json: bool) -> Result<()> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let page = tokenize_page(0, &text);

    if json {
        let rows: Vec<TokenRow> = page
            .tokens()
            .map(|t| TokenRow {
                position: t.position.to_string(),
                raw: &t.raw,
                key: &t.key,
            })
            .collect();
        return output::print_json("tokenize.tokens", rows);
    }

    for segment in &page.segments {
        match segment {
            Segment::Heading(heading) => println!("## {}", heading.title),
            Segment::Words { tokens } => {
                for token in tokens {
                    println!("{:>6}  {}  {}", token.position, token.raw, token.key);
                }
            }
        }
    }
    Ok(())
}
