use crate::commands::{display_name, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::DiaryEntry;
use crate::store::RecordStore;

/// Overwrites the stored entry with the same id. Every field is replaced, none merged;
/// the creation date stays as stored.
pub fn run<S: RecordStore>(store: &mut S, entry: &DiaryEntry) -> Result<CmdResult> {
    let stored = store.update(entry)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Entry updated: {}",
        display_name(&stored)
    )));
    result.affected_entries.push(stored);
    Ok(result)
}
