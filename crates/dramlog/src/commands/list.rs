use crate::commands::{CmdMessage, CmdResult};
use crate::store::RecordStore;
use tracing::warn;

/// Lists every entry, newest first. A store failure yields an empty listing.
pub fn run<S: RecordStore>(store: &S) -> CmdResult {
    match store.list_all() {
        Ok(entries) => CmdResult::default().with_listed_entries(entries),
        Err(e) => {
            warn!(error = %e, "failed to list diary entries");
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::warning(format!(
                "Could not load entries: {}",
                e
            )));
            result
        }
    }
}
