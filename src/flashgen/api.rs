//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It serves as the
//! single entry point for all flashgen operations, regardless of the UI.
//!
//! It:
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (display indexes and id prefixes become [`Selector`]s)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no business logic, no I/O and no formatting.
//!
//! ## Generic Over Store and Backend
//!
//! `FlashApi<S: DataStore, B: Backend>`:
//! - Production: `FlashApi<FileStore, Box<dyn Backend>>`
//! - Testing: `FlashApi<InMemoryStore, ScriptedBackend>`

use crate::commands;
use crate::config::FlashgenConfig;
use crate::error::{FlashError, Result};
use crate::export::ExportFormat;
use crate::generate::{Backend, CardGenerator, GeneratorSettings};
use crate::index::Selector;
use crate::model::Difficulty;
use crate::store::DataStore;

pub struct FlashApi<S: DataStore, B: Backend> {
    store: S,
    generator: CardGenerator<B>,
    config: FlashgenConfig,
    paths: commands::FlashPaths,
}

impl<S: DataStore, B: Backend> FlashApi<S, B> {
    pub fn new(store: S, backend: B, config: FlashgenConfig, paths: commands::FlashPaths) -> Self {
        let settings = GeneratorSettings::from(&config);
        Self::with_settings(store, backend, settings, config, paths)
    }

    pub fn with_settings(
        store: S,
        backend: B,
        settings: GeneratorSettings,
        config: FlashgenConfig,
        paths: commands::FlashPaths,
    ) -> Self {
        Self {
            store,
            generator: CardGenerator::new(backend, settings),
            config,
            paths,
        }
    }

    pub fn generate(
        &mut self,
        input: commands::generate::GenerateInput,
    ) -> Result<commands::CmdResult> {
        commands::generate::run(&mut self.store, &self.generator, &self.config, input)
    }

    pub fn list_collections(
        &self,
        subject: Option<&str>,
        search: Option<&str>,
    ) -> Result<commands::CmdResult> {
        commands::list::run(&self.store, subject, search)
    }

    pub fn show_collections<I: AsRef<str>>(&self, indexes: &[I]) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(indexes)?;
        commands::show::run(&self.store, &selectors)
    }

    pub fn delete_collections<I: AsRef<str>>(
        &mut self,
        indexes: &[I],
    ) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(indexes)?;
        commands::delete::run(&mut self.store, &selectors)
    }

    pub fn export_collection(&self, index: &str, format: &str) -> Result<commands::CmdResult> {
        let format: ExportFormat = format.parse()?;
        commands::export::run(&self.store, &parse_selector(index)?, format)
    }

    pub fn stats(&self) -> Result<commands::CmdResult> {
        commands::stats::run(&self.store)
    }

    pub fn add_card(
        &mut self,
        index: &str,
        front: &str,
        back: &str,
        difficulty: Option<Difficulty>,
        topic: Option<String>,
    ) -> Result<commands::CmdResult> {
        let selector = parse_selector(index)?;
        commands::cards::add(&mut self.store, &selector, front, back, difficulty, topic)
    }

    pub fn remove_card(&mut self, index: &str, card: &str) -> Result<commands::CmdResult> {
        let (selector, card) = (parse_selector(index)?, parse_selector(card)?);
        commands::cards::remove(&mut self.store, &selector, &card)
    }

    pub fn edit_card(
        &mut self,
        index: &str,
        card: &str,
        changes: commands::cards::CardEdit,
    ) -> Result<commands::CmdResult> {
        let (selector, card) = (parse_selector(index)?, parse_selector(card)?);
        commands::cards::edit(&mut self.store, &selector, &card, changes)
    }

    pub fn enhance_card(
        &mut self,
        index: &str,
        card: &str,
        apply: bool,
    ) -> Result<commands::CmdResult> {
        let (selector, card) = (parse_selector(index)?, parse_selector(card)?);
        commands::cards::enhance(&mut self.store, &self.generator, &selector, &card, apply)
    }

    pub fn check_backend(&self) -> Result<commands::CmdResult> {
        commands::check::run(&self.generator)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn backend_name(&self) -> &str {
        self.generator.backend().name()
    }
}

fn parse_selector(input: &str) -> Result<Selector> {
    input.parse().map_err(FlashError::Api)
}

fn parse_selectors<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<Selector>> {
    if inputs.is_empty() {
        return Err(FlashError::Api("No collection selected".to_string()));
    }
    inputs.iter().map(|s| parse_selector(s.as_ref())).collect()
}

pub use crate::commands::cards::CardEdit;
pub use crate::commands::config::ConfigAction;
pub use crate::commands::generate::GenerateInput;
pub use commands::{CmdMessage, CmdResult, ExportOutput, FlashPaths, GenerationReport, MessageLevel};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::testing::{cards_json, instant_settings, ScriptedBackend};
    use crate::store::memory::InMemoryStore;

    const TEXT: &str = "Mitochondria are the site of cellular respiration in eukaryotic cells. \
        They produce most of the ATP a cell uses.";

    fn api(backend: ScriptedBackend) -> FlashApi<InMemoryStore, ScriptedBackend> {
        FlashApi::with_settings(
            InMemoryStore::new(),
            backend,
            instant_settings(),
            FlashgenConfig::default(),
            FlashPaths {
                data_dir: std::env::temp_dir(),
            },
        )
    }

    #[test]
    fn generate_then_show_by_index() {
        let mut api = api(ScriptedBackend::new().reply(cards_json(12)));
        api.generate(GenerateInput::new(TEXT)).unwrap();

        let shown = api.show_collections(&["1"]).unwrap();
        assert_eq!(shown.affected_collections[0].cards.len(), 12);
    }

    #[test]
    fn unsupported_export_format_fails_before_lookup() {
        let api = api(ScriptedBackend::new());
        assert!(matches!(
            api.export_collection("1", "pdf"),
            Err(FlashError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn invalid_selectors_are_api_errors() {
        let mut api = api(ScriptedBackend::new());
        assert!(matches!(
            api.delete_collections(&["zero"]),
            Err(FlashError::Api(_))
        ));
        assert!(matches!(
            api.delete_collections::<&str>(&[]),
            Err(FlashError::Api(_))
        ));
    }

    #[test]
    fn card_commands_dispatch() {
        let mut api = api(ScriptedBackend::new().reply(cards_json(10)));
        api.generate(GenerateInput::new(TEXT)).unwrap();

        api.add_card("1", "What does ATP stand for?", "Adenosine triphosphate.", None, None)
            .unwrap();
        api.remove_card("1", "1").unwrap();
        let shown = api.show_collections(&["1"]).unwrap();
        assert_eq!(shown.affected_collections[0].cards.len(), 10);
        assert_eq!(
            shown.affected_collections[0].cards[9].front,
            "What does ATP stand for?"
        );
    }

    #[test]
    fn reports_backend_name() {
        assert_eq!(api(ScriptedBackend::new()).backend_name(), "scripted");
    }
}
