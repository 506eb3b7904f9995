use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{subject_matches, DataStore};

use super::helpers::indexed_collections;

/// Lists collections newest first.
///
/// Display indexes always refer to the unfiltered listing, so `show 3` means
/// the same collection whether or not a filter was used to find it.
pub fn run<S: DataStore>(
    store: &S,
    subject: Option<&str>,
    search: Option<&str>,
) -> Result<CmdResult> {
    let needle = search.map(|s| s.trim().to_lowercase());
    let listed: Vec<_> = indexed_collections(store)?
        .into_iter()
        .filter(|ic| subject.is_none_or(|s| subject_matches(&ic.metadata.subject, s)))
        .filter(|ic| {
            needle.as_deref().is_none_or(|n| {
                ic.metadata.title.to_lowercase().contains(n)
                    || ic.metadata.subject.to_lowercase().contains(n)
            })
        })
        .collect();

    let mut result = CmdResult::default();
    if listed.is_empty() && (subject.is_some() || search.is_some()) {
        result.add_message(CmdMessage::info("No matching collections."));
    }
    Ok(result.with_listed_collections(listed))
}
