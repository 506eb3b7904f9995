use crate::error::{FlashError, Result};
use crate::index::{index_collections, position, IndexedCollection, Selector};
use crate::model::Collection;
use crate::store::DataStore;
use uuid::Uuid;

pub fn indexed_collections<S: DataStore>(store: &S) -> Result<Vec<IndexedCollection>> {
    Ok(index_collections(store.list_metadata()?))
}

/// Resolves every selector to `(display index, id)` before anything is touched,
/// so one bad selector fails the whole command.
pub fn resolve_selectors<S: DataStore>(
    store: &S,
    selectors: &[Selector],
) -> Result<Vec<(usize, Uuid)>> {
    let indexed = indexed_collections(store)?;

    selectors
        .iter()
        .map(|selector| {
            position(&indexed, selector, |ic| ic.metadata.id)
                .map(|pos| (indexed[pos].index, indexed[pos].metadata.id))
                .map_err(|e| FlashError::Api(format!("Collection {}", lowercase_first(&e))))
        })
        .collect()
}

pub fn collection_by_selector<S: DataStore>(
    store: &S,
    selector: &Selector,
) -> Result<(usize, Collection)> {
    let resolved = resolve_selectors(store, std::slice::from_ref(selector))?;
    let (index, id) = resolved[0];
    Ok((index, store.get_collection(&id)?))
}

/// Zero-based position of a card inside `collection`.
pub fn card_position(collection: &Collection, selector: &Selector) -> Result<usize> {
    position(&collection.cards, selector, |card| card.id)
        .map_err(|e| FlashError::Api(format!("Card {}", lowercase_first(&e))))
}

fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
