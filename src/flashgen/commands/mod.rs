use crate::config::FlashgenConfig;
use crate::export::ExportFormat;
use crate::index::IndexedCollection;
use crate::model::{Collection, Flashcard, Stats};
use crate::normalize::ContentStats;
use std::path::PathBuf;

pub mod cards;
pub mod check;
pub mod config;
pub mod delete;
pub mod export;
pub mod generate;
pub mod helpers;
pub mod list;
pub mod show;
pub mod stats;

#[derive(Debug, Clone)]
pub struct FlashPaths {
    /// Holds `config.json` and the store files.
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Bytes produced by an export, with the file name they should be saved under.
#[derive(Debug, Clone)]
pub struct ExportOutput {
    pub format: ExportFormat,
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// What a generation run produced.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// Empty when too few cards survived validation.
    pub collection: Collection,
    pub dropped: usize,
    pub duplicates: usize,
    pub truncated: bool,
    pub saved: bool,
    pub content: ContentStats,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_collections: Vec<Collection>,
    pub listed_collections: Vec<IndexedCollection>,
    pub affected_cards: Vec<Flashcard>,
    pub generation: Option<GenerationReport>,
    pub export: Option<ExportOutput>,
    pub stats: Option<Stats>,
    pub config: Option<FlashgenConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_collections(mut self, collections: Vec<Collection>) -> Self {
        self.affected_collections = collections;
        self
    }

    pub fn with_listed_collections(mut self, collections: Vec<IndexedCollection>) -> Self {
        self.listed_collections = collections;
        self
    }

    pub fn with_affected_cards(mut self, cards: Vec<Flashcard>) -> Self {
        self.affected_cards = cards;
        self
    }

    pub fn with_export(mut self, export: ExportOutput) -> Self {
        self.export = Some(export);
        self
    }

    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_config(mut self, config: FlashgenConfig) -> Self {
        self.config = Some(config);
        self
    }
}
