use super::RecordStore;
use crate::error::{DiaryError, Result};
use crate::model::{DiaryEntry, EntryId};
use crate::search;
use std::collections::HashSet;

#[derive(Clone)]
struct StoredEntry {
    seq: u64,
    entry: DiaryEntry,
}

/// In-memory diary store for testing.
///
/// Follows the same ordering and search rules as the SQLite store, and can simulate the
/// failures a real store context produces.
#[derive(Default)]
pub struct InMemoryStore {
    entries: Vec<StoredEntry>,
    next_seq: u64,
    unavailable: bool,
    simulate_write_error: bool,
    failing_ids: HashSet<EntryId>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail as if the store context were gone.
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&mut self, simulate: bool) {
        self.simulate_write_error = simulate;
    }

    /// Make writes touching one entry fail.
    pub fn fail_writes_for(&mut self, id: EntryId) {
        self.failing_ids.insert(id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable {
            return Err(DiaryError::InvalidContext);
        }
        Ok(())
    }

    fn check_writable(&self, id: &EntryId) -> Result<()> {
        self.check_available()?;
        if self.simulate_write_error || self.failing_ids.contains(id) {
            return Err(DiaryError::Store("Simulated write error".to_string()));
        }
        Ok(())
    }

    fn sorted<'a>(&self, stored: impl Iterator<Item = &'a StoredEntry>) -> Vec<DiaryEntry> {
        let mut matched: Vec<&StoredEntry> = stored.collect();
        matched.sort_by(|a, b| {
            b.entry
                .date
                .cmp(&a.entry.date)
                .then_with(|| b.seq.cmp(&a.seq))
        });
        matched.into_iter().map(|s| s.entry.clone()).collect()
    }

    fn position(&self, id: &EntryId) -> Option<usize> {
        self.entries.iter().position(|s| s.entry.id == *id)
    }
}

impl RecordStore for InMemoryStore {
    fn list_all(&self) -> Result<Vec<DiaryEntry>> {
        self.check_available()?;
        Ok(self.sorted(self.entries.iter()))
    }

    fn search(&self, term: &str) -> Result<Vec<DiaryEntry>> {
        self.check_available()?;
        let needle = search::fold(term);
        if needle.is_empty() {
            return self.list_all();
        }
        Ok(self.sorted(
            self.entries
                .iter()
                .filter(|s| search::name_matches(s.entry.name(), &needle)),
        ))
    }

    fn get(&self, id: &EntryId) -> Result<DiaryEntry> {
        self.check_available()?;
        self.position(id)
            .map(|i| self.entries[i].entry.clone())
            .ok_or(DiaryError::EntryNotFound(*id))
    }

    fn insert(&mut self, entry: &DiaryEntry) -> Result<()> {
        self.check_writable(&entry.id)?;
        if self.position(&entry.id).is_some() {
            return Err(DiaryError::Store(format!("Duplicate entry id: {}", entry.id)));
        }
        self.next_seq += 1;
        self.entries.push(StoredEntry {
            seq: self.next_seq,
            entry: entry.clone(),
        });
        Ok(())
    }

    fn update(&mut self, entry: &DiaryEntry) -> Result<DiaryEntry> {
        self.check_writable(&entry.id)?;
        let index = self
            .position(&entry.id)
            .ok_or(DiaryError::EntryNotFound(entry.id))?;
        let stored = &mut self.entries[index].entry;
        stored.fields = entry.fields.clone();
        Ok(stored.clone())
    }

    fn delete(&mut self, id: &EntryId) -> Result<DiaryEntry> {
        self.check_writable(id)?;
        let index = self.position(id).ok_or(DiaryError::EntryNotFound(*id))?;
        Ok(self.entries.remove(index).entry)
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::EntryFields;
    use chrono::{Duration, Utc};

    pub struct StoreFixture {
        pub store: InMemoryStore,
        offset: i64,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
                offset: 0,
            }
        }

        /// Adds a named entry dated one second after the previous fixture entry.
        pub fn with_entry(mut self, name: &str) -> Self {
            let mut entry = DiaryEntry::new(EntryFields::new().with_name(name));
            entry.date = Utc::now() + Duration::seconds(self.offset);
            self.offset += 1;
            self.store.insert(&entry).unwrap();
            self
        }

        pub fn with_unnamed_entry(mut self) -> Self {
            let mut entry = DiaryEntry::new(EntryFields::default());
            entry.date = Utc::now() + Duration::seconds(self.offset);
            self.offset += 1;
            self.store.insert(&entry).unwrap();
            self
        }
    }
}
