//! Editing the cards of a stored collection.
//!
//! Every change goes through the same rules generated cards pass
//! ([`check_texts`]), and an added or edited card may not duplicate another
//! card of the same collection.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{FlashError, Result};
use crate::generate::{Backend, CardGenerator};
use crate::index::Selector;
use crate::model::{Collection, Difficulty, Flashcard};
use crate::store::DataStore;
use crate::validate::{check_texts, dedup};

use super::helpers::{card_position, collection_by_selector};

#[derive(Debug, Clone, Default)]
pub struct CardEdit {
    pub front: Option<String>,
    pub back: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub topic: Option<String>,
}

impl CardEdit {
    pub fn is_empty(&self) -> bool {
        self.front.is_none()
            && self.back.is_none()
            && self.difficulty.is_none()
            && self.topic.is_none()
    }
}

pub fn add<S: DataStore>(
    store: &mut S,
    selector: &Selector,
    front: &str,
    back: &str,
    difficulty: Option<Difficulty>,
    topic: Option<String>,
) -> Result<CmdResult> {
    check_texts(front, back).map_err(FlashError::Api)?;
    let (index, mut collection) = collection_by_selector(store, selector)?;

    let mut card = Flashcard::new(
        front.trim().to_string(),
        back.trim().to_string(),
        collection.metadata.subject.clone(),
        difficulty
            .or(collection.metadata.difficulty)
            .unwrap_or(Difficulty::Medium),
    );
    card.topic = topic.filter(|t| !t.trim().is_empty());

    ensure_unique(&collection, &card)?;
    collection.append(card.clone());
    store.save_collection(&collection)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Added card {} to collection ({}): {}",
        collection.cards.len(),
        index,
        collection.metadata.title
    )));
    Ok(result
        .with_affected_cards(vec![card])
        .with_affected_collections(vec![collection]))
}

pub fn remove<S: DataStore>(
    store: &mut S,
    selector: &Selector,
    card: &Selector,
) -> Result<CmdResult> {
    let (index, mut collection) = collection_by_selector(store, selector)?;
    let pos = card_position(&collection, card)?;
    let card_id = collection.cards[pos].id;
    let removed = collection.remove(&card_id)?;
    store.save_collection(&collection)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Removed card {} from collection ({}): {}",
        pos + 1,
        index,
        removed.front
    )));
    if collection.cards.is_empty() {
        result.add_message(CmdMessage::warning("The collection has no cards left."));
    }
    Ok(result
        .with_affected_cards(vec![removed])
        .with_affected_collections(vec![collection]))
}

pub fn edit<S: DataStore>(
    store: &mut S,
    selector: &Selector,
    card: &Selector,
    changes: CardEdit,
) -> Result<CmdResult> {
    if changes.is_empty() {
        return Err(FlashError::Api("Nothing to change".to_string()));
    }

    let (index, mut collection) = collection_by_selector(store, selector)?;
    let pos = card_position(&collection, card)?;

    let mut updated = collection.cards[pos].clone();
    if let Some(front) = changes.front {
        updated.front = front.trim().to_string();
    }
    if let Some(back) = changes.back {
        updated.back = back.trim().to_string();
    }
    if let Some(difficulty) = changes.difficulty {
        updated.difficulty = difficulty;
    }
    if let Some(topic) = changes.topic {
        updated.topic = Some(topic.trim().to_string()).filter(|t| !t.is_empty());
    }
    check_texts(&updated.front, &updated.back).map_err(FlashError::Api)?;

    replace_card(&mut collection, pos, updated.clone())?;
    store.save_collection(&collection)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Updated card {} in collection ({})",
        pos + 1,
        index
    )));
    Ok(result
        .with_affected_cards(vec![updated])
        .with_affected_collections(vec![collection]))
}

/// Asks the backend for a better wording of one card. The suggestion is only
/// stored when `apply` is set.
pub fn enhance<S: DataStore, B: Backend>(
    store: &mut S,
    generator: &CardGenerator<B>,
    selector: &Selector,
    card: &Selector,
    apply: bool,
) -> Result<CmdResult> {
    let (index, mut collection) = collection_by_selector(store, selector)?;
    let pos = card_position(&collection, card)?;

    let (front, back) = generator.enhance(&collection.cards[pos])?;
    let mut suggestion = collection.cards[pos].clone();
    suggestion.front = front.trim().to_string();
    suggestion.back = back.trim().to_string();
    check_texts(&suggestion.front, &suggestion.back)
        .map_err(|e| FlashError::Parse(format!("Enhanced card is invalid: {}", e)))?;

    let mut result = CmdResult::default();
    if suggestion == collection.cards[pos] {
        result.add_message(CmdMessage::info("The backend suggested no changes."));
    } else if apply {
        replace_card(&mut collection, pos, suggestion.clone())?;
        store.save_collection(&collection)?;
        result.add_message(CmdMessage::success(format!(
            "Enhanced card {} in collection ({})",
            pos + 1,
            index
        )));
    } else {
        result.add_message(CmdMessage::info("Suggestion not saved (use --apply)."));
    }

    Ok(result
        .with_affected_cards(vec![suggestion])
        .with_affected_collections(vec![collection]))
}

fn replace_card(collection: &mut Collection, pos: usize, card: Flashcard) -> Result<()> {
    let mut others = collection.clone();
    others.cards.remove(pos);
    ensure_unique(&others, &card)?;

    let slot = collection.card_mut(&card.id)?;
    *slot = card;
    collection.touch();
    Ok(())
}

fn ensure_unique(collection: &Collection, card: &Flashcard) -> Result<()> {
    let mut cards = collection.cards.clone();
    cards.push(card.clone());
    let before = cards.len();
    if dedup(cards).len() < before {
        return Err(FlashError::Api(
            "An identical card already exists in this collection".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::testing::{instant_settings, ScriptedBackend};
    use crate::store::memory::fixtures::StoreFixture;

    fn fixture() -> StoreFixture {
        StoreFixture::new().with_collection("Cells", "Biology", 10)
    }

    fn stored(fixture: &StoreFixture) -> Collection {
        let id = fixture.store.list_metadata().unwrap()[0].id;
        fixture.store.get_collection(&id).unwrap()
    }

    #[test]
    fn add_appends_and_updates_count() {
        let mut fixture = fixture();
        add(
            &mut fixture.store,
            &Selector::Index(1),
            "What is a ribosome?",
            "The site of protein synthesis.",
            Some(Difficulty::Hard),
            Some("Organelles".into()),
        )
        .unwrap();

        let collection = stored(&fixture);
        assert_eq!(collection.cards.len(), 11);
        assert_eq!(collection.metadata.card_count, 11);
        let last = collection.cards.last().unwrap();
        assert_eq!(last.subject, "Biology");
        assert_eq!(last.difficulty, Difficulty::Hard);
        assert_eq!(last.topic.as_deref(), Some("Organelles"));
    }

    #[test]
    fn add_rejects_invalid_and_duplicate_cards() {
        let mut fixture = fixture();
        let short = add(
            &mut fixture.store,
            &Selector::Index(1),
            "Why?",
            "Because it is.",
            None,
            None,
        );
        assert!(matches!(short, Err(FlashError::Api(_))));

        let duplicate = add(
            &mut fixture.store,
            &Selector::Index(1),
            "biology QUESTION number 1?",
            "Biology answer number 1.",
            None,
            None,
        );
        assert!(matches!(duplicate, Err(FlashError::Api(_))));
        assert_eq!(stored(&fixture).cards.len(), 10);
    }

    #[test]
    fn remove_by_position() {
        let mut fixture = fixture();
        let result = remove(&mut fixture.store, &Selector::Index(1), &Selector::Index(2)).unwrap();
        assert_eq!(result.affected_cards[0].front, "Biology question number 2?");

        let collection = stored(&fixture);
        assert_eq!(collection.cards.len(), 9);
        assert_eq!(collection.cards[1].front, "Biology question number 3?");
    }

    #[test]
    fn edit_changes_only_given_fields() {
        let mut fixture = fixture();
        let original = stored(&fixture).cards[0].clone();
        edit(
            &mut fixture.store,
            &Selector::Index(1),
            &Selector::Index(1),
            CardEdit {
                back: Some("A rewritten, longer answer.".into()),
                ..Default::default()
            },
        )
        .unwrap();

        let card = stored(&fixture).cards[0].clone();
        assert_eq!(card.id, original.id);
        assert_eq!(card.front, original.front);
        assert_eq!(card.back, "A rewritten, longer answer.");
    }

    #[test]
    fn edit_into_duplicate_is_rejected() {
        let mut fixture = fixture();
        let second = stored(&fixture).cards[1].clone();
        let err = edit(
            &mut fixture.store,
            &Selector::Index(1),
            &Selector::Index(1),
            CardEdit {
                front: Some(second.front),
                back: Some(second.back),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, FlashError::Api(_)));
    }

    #[test]
    fn empty_edit_is_rejected() {
        let mut fixture = fixture();
        assert!(edit(
            &mut fixture.store,
            &Selector::Index(1),
            &Selector::Index(1),
            CardEdit::default()
        )
        .is_err());
    }

    #[test]
    fn enhance_applies_suggestion_when_asked() {
        let mut fixture = fixture();
        let generator = CardGenerator::new(
            ScriptedBackend::new().reply(
                r#"{"enhanced_question": "Which organelle makes ATP?", "enhanced_answer": "The mitochondrion, via cellular respiration."}"#,
            ),
            instant_settings(),
        );

        enhance(
            &mut fixture.store,
            &generator,
            &Selector::Index(1),
            &Selector::Index(3),
            true,
        )
        .unwrap();

        let card = stored(&fixture).cards[2].clone();
        assert_eq!(card.front, "Which organelle makes ATP?");
        assert_eq!(card.back, "The mitochondrion, via cellular respiration.");
    }

    #[test]
    fn enhance_without_apply_leaves_store_alone() {
        let mut fixture = fixture();
        let generator = CardGenerator::new(
            ScriptedBackend::new().reply(r#"{"enhanced_question": "Which organelle makes ATP?"}"#),
            instant_settings(),
        );

        let result = enhance(
            &mut fixture.store,
            &generator,
            &Selector::Index(1),
            &Selector::Index(1),
            false,
        )
        .unwrap();

        assert_eq!(result.affected_cards[0].front, "Which organelle makes ATP?");
        assert_eq!(stored(&fixture).cards[0].front, "Biology question number 1?");
    }
}
