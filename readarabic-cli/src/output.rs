//! Shared JSON schema helpers for `--json` output.

use serde::Serialize;

pub const SCHEMA_VERSION: &str = "2025-01-readarabic-v1";

/// Standard envelope for machine-consumable responses.
#[derive(Serialize)]
pub struct Envelope<T> {
    pub schema_version: &'static str,
    pub kind: &'static str,
    pub data: T,
}

pub fn envelope<T>(kind: &'static str, data: T) -> Envelope<T> {
    Envelope {
        schema_version: SCHEMA_VERSION,
        kind,
        data,
    }
}

pub fn print_json<T: Serialize>(kind: &'static str, data: T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&envelope(kind, data))?;
    println!("{json}");
    Ok(())
}

#[derive(Serialize)]
pub struct AnnotationRow<'a> {
    pub position: String,
    pub key: &'a str,
    pub translation: &'a str,
    pub server_id: Option<&'a str>,
}

#[derive(Serialize)]
pub struct TokenRow<'a> {
    pub position: String,
    pub raw: &'a str,
    pub key: &'a str,
}
