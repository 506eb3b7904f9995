//! # Validator / Deduplicator
//!
//! Turns candidate cards into schema-valid, unique [`Flashcard`]s.
//!
//! A candidate is dropped (and counted) when its question or answer is
//! missing, shorter than [`MIN_TEXT_CHARS`] after trimming, or longer than the
//! question/answer caps. Survivors get a fresh id, the request's subject, and
//! their own difficulty when it parses (else the requested one, else medium).
//!
//! Duplicates are detected on the whitespace-collapsed, lowercased front and
//! back text; the first occurrence wins and order is preserved.
//!
//! If fewer than [`MIN_CARDS`] cards survive, the whole batch is discarded and
//! every candidate counts as dropped.

use crate::generate::CandidateCard;
use crate::model::{Difficulty, Flashcard, GenerationRequest, MIN_CARDS};
use std::collections::HashSet;
use tracing::debug;

pub const MIN_TEXT_CHARS: usize = 10;
pub const MAX_FRONT_CHARS: usize = 500;
pub const MAX_BACK_CHARS: usize = 1000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub cards: Vec<Flashcard>,
    /// Candidates rejected as malformed (or discarded with a short batch).
    pub dropped: usize,
    /// Valid candidates removed as duplicates of an earlier card. Zero when
    /// the batch was discarded, since `dropped` already covers them.
    pub duplicates: usize,
}

impl Validation {
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

pub fn validate(request: &GenerationRequest, candidates: Vec<CandidateCard>) -> Validation {
    let total = candidates.len();
    let mut dropped = 0;
    let mut valid = Vec::with_capacity(total);

    for candidate in candidates {
        match to_flashcard(request, candidate) {
            Some(card) => valid.push(card),
            None => dropped += 1,
        }
    }

    let before_dedup = valid.len();
    let mut cards = dedup(valid);
    let duplicates = before_dedup - cards.len();
    cards.truncate(request.count);

    if cards.len() < MIN_CARDS {
        debug!(
            kept = cards.len(),
            total, "too few valid cards survived, discarding batch"
        );
        return Validation {
            cards: Vec::new(),
            dropped: total,
            duplicates: 0,
        };
    }

    Validation {
        cards,
        dropped,
        duplicates,
    }
}

/// Removes cards whose normalized front and back repeat an earlier card.
///
/// Idempotent: `dedup(dedup(x)) == dedup(x)`.
pub fn dedup(cards: Vec<Flashcard>) -> Vec<Flashcard> {
    let mut seen = HashSet::new();
    cards
        .into_iter()
        .filter(|card| seen.insert(dedup_key(&card.front, &card.back)))
        .collect()
}

fn dedup_key(front: &str, back: &str) -> String {
    format!("{}\u{1f}{}", fold(front), fold(back))
}

fn fold(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Checks one question/answer pair against the card rules.
pub fn check_texts(front: &str, back: &str) -> Result<(), String> {
    let (front, back) = (front.trim(), back.trim());
    if front.is_empty() {
        return Err("Question cannot be empty".to_string());
    }
    if back.is_empty() {
        return Err("Answer cannot be empty".to_string());
    }
    if front.chars().count() < MIN_TEXT_CHARS {
        return Err(format!(
            "Question is too short (minimum {} characters)",
            MIN_TEXT_CHARS
        ));
    }
    if back.chars().count() < MIN_TEXT_CHARS {
        return Err(format!(
            "Answer is too short (minimum {} characters)",
            MIN_TEXT_CHARS
        ));
    }
    if front.chars().count() > MAX_FRONT_CHARS {
        return Err(format!(
            "Question is too long (maximum {} characters)",
            MAX_FRONT_CHARS
        ));
    }
    if back.chars().count() > MAX_BACK_CHARS {
        return Err(format!(
            "Answer is too long (maximum {} characters)",
            MAX_BACK_CHARS
        ));
    }
    Ok(())
}

fn to_flashcard(request: &GenerationRequest, candidate: CandidateCard) -> Option<Flashcard> {
    let front = candidate.front?;
    let back = candidate.back?;
    check_texts(&front, &back).ok()?;

    let difficulty = candidate
        .difficulty
        .and_then(|d| d.parse::<Difficulty>().ok())
        .or(request.difficulty)
        .unwrap_or(Difficulty::Medium);

    let mut card = Flashcard::new(
        front.trim().to_string(),
        back.trim().to_string(),
        request.subject.clone(),
        difficulty,
    );
    card.topic = non_blank(candidate.topic);
    card.source_excerpt = non_blank(candidate.source_excerpt);
    Some(card)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
