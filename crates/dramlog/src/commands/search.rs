use crate::commands::{CmdMessage, CmdResult};
use crate::store::RecordStore;
use tracing::warn;

/// Entries whose name contains `term`, newest first. An empty term lists everything.
pub fn run<S: RecordStore>(store: &S, term: &str) -> CmdResult {
    match store.search(term) {
        Ok(entries) => CmdResult::default().with_listed_entries(entries),
        Err(e) => {
            warn!(term, error = %e, "failed to search diary entries");
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::warning(format!("Search failed: {}", e)));
            result
        }
    }
}
