use crate::commands::{display_name, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{DiaryEntry, EntryFields};
use crate::store::RecordStore;

pub fn run<S: RecordStore>(store: &mut S, fields: EntryFields) -> Result<CmdResult> {
    let entry = DiaryEntry::new(fields);
    store.insert(&entry)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Entry created: {}",
        display_name(&entry)
    )));
    result.affected_entries.push(entry);
    Ok(result)
}
