//! # Storage Layer
//!
//! This module defines the storage abstraction for the diary. The [`RecordStore`] trait
//! allows the facade and commands to work against any backend.
//!
//! ## Contract
//!
//! - **Ordering**: [`RecordStore::list_all`] and [`RecordStore::search`] return entries by
//!   `date` descending; entries sharing a date come newest-created first.
//! - **Search**: case- and diacritic-insensitive containment on `name` (see
//!   [`crate::search`]). An empty term is "match all" and equals `list_all`.
//! - **Identity**: update and delete locate entries by [`EntryId`]. A missing id is reported
//!   as [`DiaryError::EntryNotFound`](crate::error::DiaryError::EntryNotFound) rather than a
//!   silent success.
//! - **Writes**: all-or-nothing. A failed commit leaves the persisted state as it was.
//! - **Availability**: when the store context is gone every operation fails with
//!   [`DiaryError::InvalidContext`](crate::error::DiaryError::InvalidContext).
//!
//! Stores never retry. Commands decide which failures are fatal to the operation
//! (writes) and which are only logged (listing and search).
//!
//! ## Implementations
//!
//! - [`sqlite::SqliteStore`]: Production store on embedded SQLite
//!   - One `entries` table, schema migrations tracked through `user_version`
//!   - Photos kept inline as BLOBs
//!
//! - [`memory::InMemoryStore`]: In-memory store for testing
//!   - No persistence
//!   - Can simulate an unavailable context and failing writes

use crate::error::Result;
use crate::model::{DiaryEntry, EntryId};

pub mod memory;
pub mod schema;
pub mod sqlite;

/// Abstract interface for diary entry storage.
///
/// Mutations take `&mut self`: one owner issues all writes, serialized.
pub trait RecordStore {
    /// Every stored entry, most recent first.
    fn list_all(&self) -> Result<Vec<DiaryEntry>>;

    /// Entries whose name contains `term`, most recent first.
    fn search(&self, term: &str) -> Result<Vec<DiaryEntry>>;

    /// A single entry by id.
    fn get(&self, id: &EntryId) -> Result<DiaryEntry>;

    /// Persist a newly built entry.
    fn insert(&mut self, entry: &DiaryEntry) -> Result<()>;

    /// Overwrite every field of the stored entry with the same id. The creation date
    /// is kept; the stored entry is returned.
    fn update(&mut self, entry: &DiaryEntry) -> Result<DiaryEntry>;

    /// Remove an entry permanently, returning what was stored.
    fn delete(&mut self, id: &EntryId) -> Result<DiaryEntry>;
}
