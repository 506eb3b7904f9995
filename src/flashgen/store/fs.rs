use super::DataStore;
use crate::error::{FlashError, Result};
use crate::model::{Collection, CollectionMeta, Flashcard};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

const INDEX_FILENAME: &str = "data.json";

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn cards_path(&self, id: &Uuid) -> PathBuf {
        self.root.join(format!("collection-{}.json", id))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
        }
        Ok(())
    }

    fn load_index(&self) -> Result<HashMap<Uuid, CollectionMeta>> {
        let data_file = self.root.join(INDEX_FILENAME);
        if !data_file.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(data_file)?;
        let index: HashMap<Uuid, CollectionMeta> = serde_json::from_str(&content)?;
        Ok(index)
    }

    fn save_index(&self, index: &HashMap<Uuid, CollectionMeta>) -> Result<()> {
        self.write_atomic(&self.root.join(INDEX_FILENAME), index)
    }

    fn load_cards(&self, id: &Uuid) -> Result<Vec<Flashcard>> {
        let path = self.cards_path(id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Writes JSON to a temp file next to `target`, then renames it into place.
    fn write_atomic<T: Serialize + ?Sized>(&self, target: &Path, value: &T) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(value)?;
        let tmp = self.root.join(format!(".tmp-{}.json", Uuid::new_v4()));
        fs::write(&tmp, content)?;
        fs::rename(&tmp, target).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            FlashError::Io(e)
        })
    }
}

impl DataStore for FileStore {
    fn save_collection(&mut self, collection: &Collection) -> Result<()> {
        let id = collection.id();
        debug!(%id, root = %self.root.display(), "saving collection");

        // Cards first: the index must never point at a missing cards file
        self.write_atomic(&self.cards_path(&id), &collection.cards)?;

        let mut index = self.load_index()?;
        index.insert(id, collection.metadata.clone());
        self.save_index(&index)
    }

    fn get_collection(&self, id: &Uuid) -> Result<Collection> {
        let index = self.load_index()?;
        let metadata = index
            .get(id)
            .cloned()
            .ok_or(FlashError::CollectionNotFound(*id))?;
        let cards = self.load_cards(id)?;
        Ok(Collection { metadata, cards })
    }

    fn list_metadata(&self) -> Result<Vec<CollectionMeta>> {
        Ok(self.load_index()?.into_values().collect())
    }

    fn delete_collection(&mut self, id: &Uuid) -> Result<()> {
        let mut index = self.load_index()?;
        if index.remove(id).is_none() {
            return Err(FlashError::CollectionNotFound(*id));
        }
        self.save_index(&index)?;

        let path = self.cards_path(id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
