//! Mapping backend text onto candidate cards.
//!
//! Models don't always follow the requested shape exactly, so parsing is
//! lenient about the envelope: an object with a `flashcards` (or `cards`)
//! array, a bare array, or either of those inside a Markdown code fence.
//! Individual elements are never rejected here; missing or mistyped fields
//! become `None` and the validator decides what to drop.

use crate::error::{FlashError, Result};
use serde_json::Value;

/// A card as the backend described it, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateCard {
    pub front: Option<String>,
    pub back: Option<String>,
    pub difficulty: Option<String>,
    pub topic: Option<String>,
    pub source_excerpt: Option<String>,
}

impl CandidateCard {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: Some(front.into()),
            back: Some(back.into()),
            ..Default::default()
        }
    }
}

pub fn parse_candidates(text: &str) -> Result<Vec<CandidateCard>> {
    let value = parse_json(text)?;
    let items = match &value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("flashcards").or_else(|| map.get("cards")) {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(FlashError::Parse(
                    "response has no \"flashcards\" array".to_string(),
                ))
            }
        },
        _ => {
            return Err(FlashError::Parse(
                "response is neither a JSON object nor an array".to_string(),
            ))
        }
    };
    Ok(items.iter().map(candidate_from).collect())
}

/// Improved `(front, back)` texts from an enhancement reply; either may be absent.
pub fn parse_enhancement(text: &str) -> Result<(Option<String>, Option<String>)> {
    let value = parse_json(text)?;
    if !value.is_object() {
        return Err(FlashError::Parse(
            "enhancement response is not a JSON object".to_string(),
        ));
    }
    Ok((
        text_field(&value, &["enhanced_question", "question", "front"]),
        text_field(&value, &["enhanced_answer", "answer", "back"]),
    ))
}

fn parse_json(text: &str) -> Result<Value> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(FlashError::Parse("empty response".to_string()));
    }
    serde_json::from_str(body)
        .map_err(|e| FlashError::Parse(format!("response is not valid JSON: {}", e)))
}

fn candidate_from(value: &Value) -> CandidateCard {
    CandidateCard {
        front: text_field(value, &["question", "front"]),
        back: text_field(value, &["answer", "back"]),
        difficulty: text_field(value, &["difficulty"]),
        topic: text_field(value, &["topic"]),
        source_excerpt: text_field(value, &["source_excerpt", "excerpt"]),
    }
}

fn text_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::to_string)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the info string (e.g. "json") on the opening fence line
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().trim_end_matches("```").trim()
}
