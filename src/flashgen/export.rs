//! Serializes cards to the supported export formats.
//!
//! Exporting is pure: the caller decides where the bytes go.

use crate::error::{FlashError, Result};
use crate::model::Flashcard;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Anki,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Anki];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Anki => "anki",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Anki => "txt",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = FlashError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "anki" => Ok(ExportFormat::Anki),
            _ => Err(FlashError::UnsupportedFormat(s.to_string())),
        }
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    front: &'a str,
    back: &'a str,
    subject: &'a str,
    difficulty: &'a str,
}

pub fn export(cards: &[Flashcard], format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Csv => to_csv(cards),
        ExportFormat::Json => to_json(cards),
        ExportFormat::Anki => Ok(to_anki(cards).into_bytes()),
    }
}

fn to_csv(cards: &[Flashcard]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    // serialize() only emits the header once a row exists
    if cards.is_empty() {
        writer.write_record(["front", "back", "subject", "difficulty"])?;
    }
    for card in cards {
        writer.serialize(CsvRow {
            front: &card.front,
            back: &card.back,
            subject: &card.subject,
            difficulty: card.difficulty.as_str(),
        })?;
    }
    writer
        .into_inner()
        .map_err(|e| FlashError::Io(e.into_error()))
}

fn to_json(cards: &[Flashcard]) -> Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(cards)?;
    bytes.push(b'\n');
    Ok(bytes)
}

fn to_anki(cards: &[Flashcard]) -> String {
    cards
        .iter()
        .map(|card| format!("{}\t{}\n", anki_field(&card.front), anki_field(&card.back)))
        .collect()
}

fn anki_field(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\t', " ")
        .replace('\n', "<br>")
}

/// File name for an export of a collection titled `title`.
pub fn suggested_filename(title: &str, format: ExportFormat) -> String {
    let safe = sanitize_filename(title);
    let stem = if safe.is_empty() {
        "flashcards".to_string()
    } else {
        safe.replace(' ', "_")
    };
    format!("{}.{}", stem, format.extension())
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}
