use crate::commands::CmdResult;
use crate::error::Result;
use crate::index::{IndexedCollection, Selector};
use crate::store::DataStore;

use super::helpers::collection_by_selector;

pub fn run<S: DataStore>(store: &S, selectors: &[Selector]) -> Result<CmdResult> {
    let mut collections = Vec::with_capacity(selectors.len());
    let mut listed = Vec::with_capacity(selectors.len());
    for selector in selectors {
        let (index, collection) = collection_by_selector(store, selector)?;
        listed.push(IndexedCollection {
            index,
            metadata: collection.metadata.clone(),
        });
        collections.push(collection);
    }

    Ok(CmdResult::default()
        .with_listed_collections(listed)
        .with_affected_collections(collections))
}
