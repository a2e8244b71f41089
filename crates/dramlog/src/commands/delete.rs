use crate::commands::{display_name, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::EntryId;
use crate::store::RecordStore;

/// Removes one entry permanently.
pub fn run<S: RecordStore>(store: &mut S, id: &EntryId) -> Result<CmdResult> {
    let entry = store.delete(id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Entry deleted: {}",
        display_name(&entry)
    )));
    result.affected_entries.push(entry);
    Ok(result)
}
