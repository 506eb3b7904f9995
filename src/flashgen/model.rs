use crate::error::{FlashError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Smallest number of cards a generation request may ask for.
pub const MIN_CARDS: usize = 10;
/// Largest number of cards a generation request may ask for.
pub const MAX_CARDS: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("Unknown difficulty: {}", other)),
        }
    }
}

/// Parses a requested difficulty level, where `mixed` maps to `None`.
pub fn parse_level(s: &str) -> std::result::Result<Option<Difficulty>, String> {
    if s.trim().eq_ignore_ascii_case("mixed") {
        return Ok(None);
    }
    s.parse().map(Some)
}

/// Label for a requested difficulty level.
pub fn level_label(level: Option<Difficulty>) -> &'static str {
    level.map(|d| d.as_str()).unwrap_or("mixed")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: Uuid,
    pub front: String,
    pub back: String,
    pub subject: String,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_excerpt: Option<String>,
}

impl Flashcard {
    pub fn new(front: String, back: String, subject: String, difficulty: Difficulty) -> Self {
        Self {
            id: Uuid::new_v4(),
            front,
            back,
            subject,
            difficulty,
            topic: None,
            source_excerpt: None,
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }
}

/// What a user asks the generator for.
///
/// `difficulty == None` requests a mix of levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub source_text: String,
    pub subject: String,
    pub difficulty: Option<Difficulty>,
    pub count: usize,
}

impl GenerationRequest {
    /// Builds a request, clamping `count` into `[MIN_CARDS, MAX_CARDS]`.
    pub fn new(
        source_text: impl Into<String>,
        subject: impl Into<String>,
        difficulty: Option<Difficulty>,
        count: usize,
    ) -> Self {
        Self {
            source_text: source_text.into(),
            subject: subject.into(),
            difficulty,
            count: count.clamp(MIN_CARDS, MAX_CARDS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionMeta {
    pub id: Uuid,
    pub title: String,
    pub subject: String,
    pub difficulty: Option<Difficulty>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    // Cached so listings don't need to load every cards file
    pub card_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub metadata: CollectionMeta,
    pub cards: Vec<Flashcard>,
}

impl Collection {
    pub fn new(
        title: String,
        subject: String,
        difficulty: Option<Difficulty>,
        cards: Vec<Flashcard>,
    ) -> Self {
        let now = Utc::now();
        Self {
            metadata: CollectionMeta {
                id: Uuid::new_v4(),
                title,
                subject,
                difficulty,
                created_at: now,
                updated_at: now,
                card_count: cards.len(),
            },
            cards,
        }
    }

    pub fn default_title(subject: &str, count: usize) -> String {
        format!("{} - {} cards", subject, count)
    }

    pub fn id(&self) -> Uuid {
        self.metadata.id
    }

    pub fn append(&mut self, card: Flashcard) {
        self.cards.push(card);
        self.touch();
    }

    pub fn remove(&mut self, card_id: &Uuid) -> Result<Flashcard> {
        let pos = self
            .cards
            .iter()
            .position(|c| &c.id == card_id)
            .ok_or(FlashError::CardNotFound(*card_id))?;
        let card = self.cards.remove(pos);
        self.touch();
        Ok(card)
    }

    pub fn card_mut(&mut self, card_id: &Uuid) -> Result<&mut Flashcard> {
        self.cards
            .iter_mut()
            .find(|c| &c.id == card_id)
            .ok_or(FlashError::CardNotFound(*card_id))
    }

    /// Refreshes `updated_at` and the cached card count after a mutation.
    pub fn touch(&mut self) {
        self.metadata.updated_at = Utc::now();
        self.metadata.card_count = self.cards.len();
    }
}

/// Aggregate numbers over every stored collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stats {
    pub total_collections: usize,
    pub total_cards: usize,
    pub subjects: Vec<String>,
}

impl Stats {
    pub fn average_cards(&self) -> f64 {
        self.total_cards as f64 / self.total_collections.max(1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(front: &str) -> Flashcard {
        Flashcard::new(
            front.into(),
            "An answer long enough".into(),
            "Biology".into(),
            Difficulty::Medium,
        )
    }

    #[test]
    fn count_is_clamped() {
        assert_eq!(GenerationRequest::new("t", "s", None, 3).count, MIN_CARDS);
        assert_eq!(GenerationRequest::new("t", "s", None, 99).count, MAX_CARDS);
        assert_eq!(GenerationRequest::new("t", "s", None, 12).count, 12);
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(" Easy ".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn mixed_level_is_none() {
        assert_eq!(parse_level("Mixed"), Ok(None));
        assert_eq!(parse_level("medium"), Ok(Some(Difficulty::Medium)));
        assert_eq!(level_label(None), "mixed");
    }

    #[test]
    fn difficulty_serializes_lowercase() {
        let json = serde_json::to_string(&Difficulty::Hard).unwrap();
        assert_eq!(json, "\"hard\"");
    }

    #[test]
    fn append_and_remove_keep_count_in_sync() {
        let mut collection = Collection::new("T".into(), "Biology".into(), None, vec![card("A")]);
        let extra = card("B");
        let extra_id = extra.id;
        collection.append(extra);
        assert_eq!(collection.metadata.card_count, 2);

        let removed = collection.remove(&extra_id).unwrap();
        assert_eq!(removed.front, "B");
        assert_eq!(collection.metadata.card_count, 1);
    }

    #[test]
    fn removing_unknown_card_fails() {
        let mut collection = Collection::new("T".into(), "Biology".into(), None, vec![]);
        let missing = Uuid::new_v4();
        assert!(matches!(
            collection.remove(&missing),
            Err(FlashError::CardNotFound(id)) if id == missing
        ));
    }

    #[test]
    fn optional_fields_are_omitted_from_json() {
        let json = serde_json::to_string(&card("Q")).unwrap();
        assert!(!json.contains("topic"));
        assert!(!json.contains("source_excerpt"));
    }
}
