//! # Storage Layer
//!
//! This module defines the storage abstraction for flashgen. The [`DataStore`]
//! trait lets the rest of the crate persist collections without knowing where
//! they end up.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production file-based storage
//!   - Collection metadata in `data.json`
//!   - Cards for each collection in `collection-{uuid}.json`
//!   - Atomic writes (temp file + rename)
//!
//! - [`memory::InMemoryStore`]: In-memory storage for testing
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── data.json                 # HashMap<Uuid, CollectionMeta>
//! ├── collection-{uuid}.json    # Vec<Flashcard>
//! └── config.json               # Settings
//! ```
//!
//! Metadata and cards are kept apart so listing and statistics never need to
//! read every cards file.

use crate::error::Result;
use crate::model::{Collection, CollectionMeta, Stats};
use std::collections::BTreeMap;
use uuid::Uuid;

pub mod fs;
pub mod memory;

/// Abstract interface for collection storage.
///
/// Implementations only need the four primitive operations; listing,
/// searching and statistics are built on top of them.
pub trait DataStore {
    /// Save a collection (create or replace)
    fn save_collection(&mut self, collection: &Collection) -> Result<()>;

    /// Get a collection with all of its cards
    fn get_collection(&self, id: &Uuid) -> Result<Collection>;

    /// Metadata for every stored collection, in no particular order
    fn list_metadata(&self) -> Result<Vec<CollectionMeta>>;

    /// Delete a collection and its cards permanently
    fn delete_collection(&mut self, id: &Uuid) -> Result<()>;

    /// Metadata newest first, optionally limited to one subject
    /// (case-insensitive).
    fn summaries(&self, subject: Option<&str>) -> Result<Vec<CollectionMeta>> {
        let mut metas: Vec<CollectionMeta> = self
            .list_metadata()?
            .into_iter()
            .filter(|m| subject.is_none_or(|s| subject_matches(&m.subject, s)))
            .collect();
        sort_newest_first(&mut metas);
        Ok(metas)
    }

    /// Full collections newest first, optionally limited to one subject.
    fn list_collections(&self, subject: Option<&str>) -> Result<Vec<Collection>> {
        self.summaries(subject)?
            .iter()
            .map(|meta| self.get_collection(&meta.id))
            .collect()
    }

    /// Metadata whose title or subject contains `term` (case-insensitive).
    fn search(&self, term: &str) -> Result<Vec<CollectionMeta>> {
        let needle = term.trim().to_lowercase();
        Ok(self
            .summaries(None)?
            .into_iter()
            .filter(|m| {
                m.title.to_lowercase().contains(&needle)
                    || m.subject.to_lowercase().contains(&needle)
            })
            .collect())
    }

    /// Totals across all collections. Subjects that differ only in case
    /// count once, under their most recent spelling.
    fn stats(&self) -> Result<Stats> {
        let metas = self.summaries(None)?;
        let mut subjects: BTreeMap<String, String> = BTreeMap::new();
        for meta in &metas {
            subjects
                .entry(meta.subject.to_lowercase())
                .or_insert_with(|| meta.subject.clone());
        }
        Ok(Stats {
            total_collections: metas.len(),
            total_cards: metas.iter().map(|m| m.card_count).sum(),
            subjects: subjects.into_values().collect(),
        })
    }
}

/// Case-insensitive subject comparison, Unicode-aware.
pub fn subject_matches(subject: &str, filter: &str) -> bool {
    subject.to_lowercase() == filter.trim().to_lowercase()
}

/// Newest first; ties broken by id so the order is stable.
pub fn sort_newest_first(metas: &mut [CollectionMeta]) {
    metas.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
}
