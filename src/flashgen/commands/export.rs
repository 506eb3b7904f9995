use crate::commands::{CmdMessage, CmdResult, ExportOutput};
use crate::error::Result;
use crate::export::{export, suggested_filename, ExportFormat};
use crate::index::Selector;
use crate::store::DataStore;

use super::helpers::collection_by_selector;

pub fn run<S: DataStore>(
    store: &S,
    selector: &Selector,
    format: ExportFormat,
) -> Result<CmdResult> {
    let (_, collection) = collection_by_selector(store, selector)?;
    let bytes = export(&collection.cards, format)?;

    let mut result = CmdResult::default();
    if collection.cards.is_empty() {
        result.add_message(CmdMessage::warning(format!(
            "\"{}\" has no cards",
            collection.metadata.title
        )));
    }

    let output = ExportOutput {
        format,
        filename: suggested_filename(&collection.metadata.title, format),
        bytes,
    };
    Ok(result
        .with_export(output)
        .with_affected_collections(vec![collection]))
}
