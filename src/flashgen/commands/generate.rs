//! # Session Controller
//!
//! Runs one generation action end to end:
//!
//! ```text
//! raw text ─▶ normalize ─▶ request ─▶ backend ─▶ validate ─▶ save ─▶ (export)
//! ```
//!
//! Errors from any step are returned as they are. The store is only written
//! after validation produced a usable collection, so a failed run never leaves
//! partial state behind.

use crate::commands::{CmdMessage, CmdResult, ExportOutput, GenerationReport};
use crate::config::FlashgenConfig;
use crate::error::{FlashError, Result};
use crate::export::{export, suggested_filename, ExportFormat};
use crate::generate::{Backend, CardGenerator};
use crate::model::{level_label, Collection, Difficulty, GenerationRequest, MIN_CARDS};
use crate::normalize::{normalize, ContentStats};
use crate::store::DataStore;
use tracing::{info, warn};

/// One generation action as the user asked for it. `None` fields fall back to
/// the configured defaults.
#[derive(Debug, Clone, Default)]
pub struct GenerateInput {
    pub text: String,
    pub subject: Option<String>,
    pub level: Option<Difficulty>,
    pub count: Option<usize>,
    pub title: Option<String>,
    pub save: bool,
    pub export: Option<ExportFormat>,
}

impl GenerateInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            save: true,
            ..Default::default()
        }
    }
}

pub fn run<S: DataStore, B: Backend>(
    store: &mut S,
    generator: &CardGenerator<B>,
    config: &FlashgenConfig,
    input: GenerateInput,
) -> Result<CmdResult> {
    let normalized = normalize(&input.text, config.max_input_chars)?;
    let total_chars = normalized.total_chars();
    if total_chars < config.min_input_chars {
        return Err(FlashError::InputTooShort {
            len: total_chars,
            min: config.min_input_chars,
        });
    }

    let subject = input
        .subject
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| config.default_subject.clone());
    let wanted = input.count.unwrap_or(config.default_count);
    let request = GenerationRequest::new(normalized.primary(), subject, input.level, wanted);

    let mut result = CmdResult::default();
    if request.count != wanted {
        result.add_message(CmdMessage::info(format!(
            "Card count adjusted from {} to {}",
            wanted, request.count
        )));
    }
    if normalized.truncated() {
        result.add_message(CmdMessage::warning(format!(
            "Input is long: only the first {} of {} characters were used",
            normalized.primary().chars().count(),
            total_chars
        )));
    }

    let candidates = generator.generate(&request)?;
    let validation = crate::validate::validate(&request, candidates);

    if validation.dropped > 0 {
        warn!(dropped = validation.dropped, "dropped malformed cards");
    }

    let mut report = GenerationReport {
        collection: Collection::new(
            String::new(),
            request.subject.clone(),
            request.difficulty,
            Vec::new(),
        ),
        dropped: validation.dropped,
        duplicates: validation.duplicates,
        truncated: normalized.truncated(),
        saved: false,
        content: ContentStats::of(normalized.primary()),
    };

    if validation.is_empty() {
        result.add_message(CmdMessage::warning(format!(
            "Fewer than {} usable cards came back ({} dropped); nothing was saved",
            MIN_CARDS, validation.dropped
        )));
        result.generation = Some(report);
        return Ok(result);
    }

    let title = input
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| Collection::default_title(&request.subject, validation.cards.len()));
    let collection = Collection::new(
        title,
        request.subject.clone(),
        request.difficulty,
        validation.cards,
    );

    if validation.dropped > 0 {
        result.add_message(CmdMessage::warning(format!(
            "Dropped {} malformed card(s)",
            validation.dropped
        )));
    }
    if validation.duplicates > 0 {
        result.add_message(CmdMessage::info(format!(
            "Removed {} duplicate card(s)",
            validation.duplicates
        )));
    }

    if let Some(format) = input.export {
        let bytes = export(&collection.cards, format)?;
        result = result.with_export(ExportOutput {
            format,
            filename: suggested_filename(&collection.metadata.title, format),
            bytes,
        });
    }

    if input.save {
        store.save_collection(&collection)?;
        report.saved = true;
        result.add_message(CmdMessage::success(format!(
            "Created \"{}\": {} {} cards",
            collection.metadata.title,
            collection.cards.len(),
            level_label(collection.metadata.difficulty)
        )));
    } else {
        result.add_message(CmdMessage::info(format!(
            "Generated {} cards (not saved)",
            collection.cards.len()
        )));
    }

    info!(
        id = %collection.id(),
        cards = collection.cards.len(),
        dropped = report.dropped,
        duplicates = report.duplicates,
        saved = report.saved,
        "generation finished"
    );

    report.collection = collection.clone();
    result.generation = Some(report);
    Ok(result.with_affected_collections(vec![collection]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::testing::{cards_json, instant_settings, ScriptedBackend};
    use crate::generate::BackendFailure;
    use crate::store::memory::InMemoryStore;

    const TEXT: &str = "Photosynthesis converts light energy into chemical energy.\n\
        Chlorophyll absorbs mostly blue and red light.\n\
        The Calvin cycle fixes carbon dioxide into sugars.";

    fn generator(backend: ScriptedBackend) -> CardGenerator<ScriptedBackend> {
        CardGenerator::new(backend, instant_settings())
    }

    fn input(count: usize) -> GenerateInput {
        GenerateInput {
            subject: Some("Biology".into()),
            count: Some(count),
            ..GenerateInput::new(TEXT)
        }
    }

    fn twelve_with_one_malformed() -> String {
        let mut value: serde_json::Value = serde_json::from_str(&cards_json(11)).unwrap();
        value["flashcards"]
            .as_array_mut()
            .unwrap()
            .insert(3, serde_json::json!({ "question": "Missing its answer?" }));
        value.to_string()
    }

    #[test]
    fn saves_valid_cards_and_reports_drops() {
        let mut store = InMemoryStore::new();
        let gen = generator(ScriptedBackend::new().reply(twelve_with_one_malformed()));

        let result = run(&mut store, &gen, &FlashgenConfig::default(), input(12)).unwrap();

        let report = result.generation.unwrap();
        assert!(report.saved);
        assert_eq!(report.dropped, 1);
        assert_eq!(report.collection.cards.len(), 11);

        let stored = store.list_collections(None).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].cards.len(), 11);
        assert_eq!(stored[0].metadata.title, "Biology - 11 cards");
        assert_eq!(stored[0].metadata.card_count, 11);
    }

    #[test]
    fn sends_one_request_with_normalized_text() {
        let mut store = InMemoryStore::new();
        let gen = generator(ScriptedBackend::new().reply(cards_json(12)));

        run(&mut store, &gen, &FlashgenConfig::default(), input(12)).unwrap();

        let prompts = gen.backend().prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].count, 12);
        assert!(prompts[0]
            .user
            .contains("Photosynthesis converts light energy into chemical energy.\n\nChlorophyll"));
    }

    #[test]
    fn backend_failure_leaves_store_untouched() {
        let mut store = InMemoryStore::new();
        let gen = generator(ScriptedBackend::new().fail(BackendFailure::fatal("500 bad")));

        let err = run(&mut store, &gen, &FlashgenConfig::default(), input(12)).unwrap_err();
        assert!(matches!(err, FlashError::Backend(_)));
        assert!(store.list_metadata().unwrap().is_empty());
    }

    #[test]
    fn parse_failure_leaves_store_untouched() {
        let mut store = InMemoryStore::new();
        let gen = generator(ScriptedBackend::new().reply("not json at all"));

        let err = run(&mut store, &gen, &FlashgenConfig::default(), input(12)).unwrap_err();
        assert!(matches!(err, FlashError::Parse(_)));
        assert!(store.list_metadata().unwrap().is_empty());
    }

    #[test]
    fn transient_failure_is_retried_once() {
        let mut store = InMemoryStore::new();
        let gen = generator(
            ScriptedBackend::new()
                .fail(BackendFailure::transient("timed out"))
                .reply(cards_json(15)),
        );

        let result = run(&mut store, &gen, &FlashgenConfig::default(), input(15)).unwrap();
        assert_eq!(gen.backend().calls(), 2);
        assert_eq!(result.generation.unwrap().collection.cards.len(), 15);
    }

    #[test]
    fn empty_input_never_calls_backend() {
        let mut store = InMemoryStore::new();
        let gen = generator(ScriptedBackend::new().reply(cards_json(12)));

        let err = run(
            &mut store,
            &gen,
            &FlashgenConfig::default(),
            GenerateInput::new(" \n\t \n"),
        )
        .unwrap_err();
        assert!(matches!(err, FlashError::EmptyInput));
        assert_eq!(gen.backend().calls(), 0);
    }

    #[test]
    fn short_input_is_rejected() {
        let mut store = InMemoryStore::new();
        let gen = generator(ScriptedBackend::new());

        let err = run(
            &mut store,
            &gen,
            &FlashgenConfig::default(),
            GenerateInput::new("Too short."),
        )
        .unwrap_err();
        assert!(matches!(err, FlashError::InputTooShort { len: 10, min: 50 }));
    }

    #[test]
    fn too_few_valid_cards_saves_nothing() {
        let mut store = InMemoryStore::new();
        let gen = generator(ScriptedBackend::new().reply(cards_json(9)));

        let result = run(&mut store, &gen, &FlashgenConfig::default(), input(12)).unwrap();

        let report = result.generation.unwrap();
        assert!(!report.saved);
        assert!(report.collection.cards.is_empty());
        assert_eq!(report.dropped, 9);
        assert!(store.list_metadata().unwrap().is_empty());
        assert!(result.affected_collections.is_empty());
    }

    #[test]
    fn no_save_keeps_store_empty() {
        let mut store = InMemoryStore::new();
        let gen = generator(ScriptedBackend::new().reply(cards_json(10)));
        let input = GenerateInput {
            save: false,
            ..input(10)
        };

        let result = run(&mut store, &gen, &FlashgenConfig::default(), input).unwrap();
        assert_eq!(result.affected_collections[0].cards.len(), 10);
        assert!(store.list_metadata().unwrap().is_empty());
    }

    #[test]
    fn count_is_clamped_and_defaults_apply() {
        let mut store = InMemoryStore::new();
        let gen = generator(ScriptedBackend::new().reply(cards_json(25)));
        let input = GenerateInput {
            count: Some(40),
            ..GenerateInput::new(TEXT)
        };

        let result = run(&mut store, &gen, &FlashgenConfig::default(), input).unwrap();
        assert_eq!(gen.backend().prompts()[0].count, 25);
        assert_eq!(gen.backend().prompts()[0].subject, "General");
        assert!(result
            .messages
            .iter()
            .any(|m| m.content == "Card count adjusted from 40 to 25"));
    }

    #[test]
    fn long_input_reports_truncation() {
        let mut store = InMemoryStore::new();
        let gen = generator(ScriptedBackend::new().reply(cards_json(10)));
        let config = FlashgenConfig {
            max_input_chars: 60,
            ..FlashgenConfig::default()
        };

        let result = run(&mut store, &gen, &config, input(10)).unwrap();
        assert!(result.generation.unwrap().truncated);
        assert!(result
            .messages
            .iter()
            .any(|m| m.level == crate::commands::MessageLevel::Warning));
    }

    #[test]
    fn exports_when_asked() {
        let mut store = InMemoryStore::new();
        let gen = generator(ScriptedBackend::new().reply(cards_json(10)));
        let input = GenerateInput {
            export: Some(ExportFormat::Anki),
            title: Some("Light reactions".into()),
            ..input(10)
        };

        let result = run(&mut store, &gen, &FlashgenConfig::default(), input).unwrap();
        let output = result.export.unwrap();
        assert_eq!(output.filename, "Light_reactions.txt");
        assert_eq!(String::from_utf8(output.bytes).unwrap().lines().count(), 10);
    }

    #[test]
    fn store_failure_is_returned() {
        let mut store = InMemoryStore::new();
        store.set_simulate_write_error(true);
        let gen = generator(ScriptedBackend::new().reply(cards_json(10)));

        let err = run(&mut store, &gen, &FlashgenConfig::default(), input(10)).unwrap_err();
        assert!(matches!(err, FlashError::Store(_)));
    }
}
