use super::DataStore;
use crate::error::{FlashError, Result};
use crate::model::{Collection, CollectionMeta};
use std::collections::HashMap;
use uuid::Uuid;

/// In-memory storage for tests. Nothing is persisted.
#[derive(Default)]
pub struct InMemoryStore {
    collections: HashMap<Uuid, Collection>,
    simulate_write_error: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following save or delete fail.
    pub fn set_simulate_write_error(&mut self, simulate: bool) {
        self.simulate_write_error = simulate;
    }

    fn check_writable(&self) -> Result<()> {
        if self.simulate_write_error {
            return Err(FlashError::Store("Simulated write error".to_string()));
        }
        Ok(())
    }
}

impl DataStore for InMemoryStore {
    fn save_collection(&mut self, collection: &Collection) -> Result<()> {
        self.check_writable()?;
        self.collections.insert(collection.id(), collection.clone());
        Ok(())
    }

    fn get_collection(&self, id: &Uuid) -> Result<Collection> {
        self.collections
            .get(id)
            .cloned()
            .ok_or(FlashError::CollectionNotFound(*id))
    }

    fn list_metadata(&self) -> Result<Vec<CollectionMeta>> {
        Ok(self
            .collections
            .values()
            .map(|c| c.metadata.clone())
            .collect())
    }

    fn delete_collection(&mut self, id: &Uuid) -> Result<()> {
        self.check_writable()?;
        self.collections
            .remove(id)
            .map(|_| ())
            .ok_or(FlashError::CollectionNotFound(*id))
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{Difficulty, Flashcard};
    use chrono::{Duration, Utc};

    pub fn sample_cards(subject: &str, count: usize) -> Vec<Flashcard> {
        (1..=count)
            .map(|i| {
                Flashcard::new(
                    format!("{} question number {}?", subject, i),
                    format!("{} answer number {}.", subject, i),
                    subject.to_string(),
                    Difficulty::Medium,
                )
            })
            .collect()
    }

    pub struct StoreFixture {
        pub store: InMemoryStore,
        created: usize,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
                created: 0,
            }
        }

        /// Adds a collection; each one is created a minute after the previous,
        /// so the last one added is listed first.
        pub fn with_collection(mut self, title: &str, subject: &str, cards: usize) -> Self {
            let mut collection = Collection::new(
                title.to_string(),
                subject.to_string(),
                None,
                sample_cards(subject, cards),
            );
            let created = Utc::now() - Duration::hours(1) + Duration::minutes(self.created as i64);
            collection.metadata.created_at = created;
            collection.metadata.updated_at = created;
            self.created += 1;
            self.store.save_collection(&collection).unwrap();
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StoreFixture;
    use super::*;

    #[test]
    fn lists_newest_first() {
        let fixture = StoreFixture::new()
            .with_collection("Old", "Biology", 10)
            .with_collection("New", "Physics", 12);

        let titles: Vec<_> = fixture
            .store
            .summaries(None)
            .unwrap()
            .into_iter()
            .map(|m| m.title)
            .collect();
        assert_eq!(titles, vec!["New", "Old"]);
    }

    #[test]
    fn filters_by_subject_case_insensitively() {
        let fixture = StoreFixture::new()
            .with_collection("Cells", "Biology", 10)
            .with_collection("Forces", "Physics", 10);

        let listed = fixture.store.list_collections(Some("biology")).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].metadata.title, "Cells");
        assert_eq!(listed[0].cards.len(), 10);
    }

    #[test]
    fn subject_filter_handles_non_ascii_case() {
        let fixture = StoreFixture::new()
            .with_collection("Marchés", "Économie", 10)
            .with_collection("Forces", "Physics", 10);

        let listed = fixture.store.list_collections(Some("économie")).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].metadata.title, "Marchés");
        assert_eq!(fixture.store.summaries(Some("ÉCONOMIE")).unwrap().len(), 1);
        assert_eq!(fixture.store.search("économie").unwrap().len(), 1);
    }

    #[test]
    fn searches_title_and_subject() {
        let fixture = StoreFixture::new()
            .with_collection("Cell structure", "Biology", 10)
            .with_collection("Forces", "Physics", 10)
            .with_collection("Reactions", "Chemistry", 10);

        assert_eq!(fixture.store.search("CELL").unwrap().len(), 1);
        assert_eq!(fixture.store.search("phys").unwrap().len(), 1);
        assert!(fixture.store.search("history").unwrap().is_empty());
    }

    #[test]
    fn stats_totals_and_distinct_subjects() {
        let fixture = StoreFixture::new()
            .with_collection("A", "Biology", 10)
            .with_collection("B", "Biology", 12)
            .with_collection("C", "Physics", 11);

        let stats = fixture.store.stats().unwrap();
        assert_eq!(stats.total_collections, 3);
        assert_eq!(stats.total_cards, 33);
        assert_eq!(stats.subjects, vec!["Biology", "Physics"]);
        assert!((stats.average_cards() - 11.0).abs() < f64::EPSILON);
    }

    #[test]
    fn stats_merges_subjects_differing_in_case() {
        let fixture = StoreFixture::new()
            .with_collection("A", "biology", 10)
            .with_collection("B", "Biology", 10)
            .with_collection("C", "économie", 10)
            .with_collection("D", "Économie", 10);

        let stats = fixture.store.stats().unwrap();
        assert_eq!(stats.subjects, vec!["Biology", "Économie"]);
    }

    #[test]
    fn simulated_write_error() {
        let mut fixture = StoreFixture::new().with_collection("A", "Biology", 10);
        let id = fixture.store.summaries(None).unwrap()[0].id;
        fixture.store.set_simulate_write_error(true);

        assert!(matches!(
            fixture.store.delete_collection(&id),
            Err(FlashError::Store(_))
        ));
        assert!(fixture.store.get_collection(&id).is_ok());
    }
}
