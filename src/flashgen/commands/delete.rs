use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::Selector;
use crate::store::DataStore;

use super::helpers::resolve_selectors;

pub fn run<S: DataStore>(store: &mut S, selectors: &[Selector]) -> Result<CmdResult> {
    let resolved = resolve_selectors(store, selectors)?;
    let mut result = CmdResult::default();

    for (display_index, id) in resolved {
        // The same collection may be selected twice (e.g. by index and by id)
        if result.affected_collections.iter().any(|c| c.id() == id) {
            continue;
        }
        let collection = store.get_collection(&id)?;
        store.delete_collection(&id)?;
        result.add_message(CmdMessage::success(format!(
            "Deleted collection ({}): {}",
            display_index, collection.metadata.title
        )));
        result.affected_collections.push(collection);
    }

    Ok(result)
}
