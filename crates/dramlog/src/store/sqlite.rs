//! SQLite implementation of [`RecordStore`].
//!
//! [`SqliteStore`] keeps every entry in one `entries` table. Each write runs in its own
//! transaction, so a failed commit leaves nothing behind. Search folds the stored names
//! through the `diary_fold` SQL function registered by [`schema`](super::schema).
//!
//! Dates are stored as nanoseconds since the Unix epoch, which round-trips `DateTime<Utc>`
//! exactly and sorts numerically.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

use super::schema::{self, FOLD_FUNCTION};
use super::RecordStore;
use crate::error::{DiaryError, Result};
use crate::model::{DiaryEntry, EntryFields, EntryId};
use crate::search;

const ENTRY_COLUMNS: &str = "id, created_at, name, distillery, abv, aged, cask, nose, palate, \
                             finish, rating_score, image";

const NEWEST_FIRST: &str = "ORDER BY created_at DESC, seq DESC";

/// SQLite-backed diary store.
///
/// Holds the store context (the connection) until [`SqliteStore::close`] is called; after
/// that every operation reports [`DiaryError::InvalidContext`].
pub struct SqliteStore {
    conn: Option<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and applies pending migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = schema::open_database(path)?;
        info!(path = %path.display(), "diary store opened");
        Ok(Self { conn: Some(conn) })
    }

    /// Opens a private in-memory database.
    pub fn in_memory() -> Result<Self> {
        let conn = schema::open_in_memory()?;
        Ok(Self { conn: Some(conn) })
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Releases the connection. Closing twice is a no-op.
    pub fn close(&mut self) -> Result<()> {
        match self.conn.take() {
            Some(conn) => {
                conn.close().map_err(|(_, e)| DiaryError::Persistence(e))?;
                info!("diary store closed");
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn context(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(DiaryError::InvalidContext)
    }

    fn context_mut(&mut self) -> Result<&mut Connection> {
        self.conn.as_mut().ok_or(DiaryError::InvalidContext)
    }

    fn query(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<DiaryEntry>> {
        let conn = self.context()?;
        let mut stmt = conn.prepare_cached(sql)?;
        let entries = stmt
            .query_map(params, entry_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }
}

impl RecordStore for SqliteStore {
    fn list_all(&self) -> Result<Vec<DiaryEntry>> {
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM entries {NEWEST_FIRST}");
        let entries = self.query(&sql, [])?;
        debug!(count = entries.len(), "listed entries");
        Ok(entries)
    }

    fn search(&self, term: &str) -> Result<Vec<DiaryEntry>> {
        let needle = search::fold(term);
        if needle.is_empty() {
            return self.list_all();
        }

        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM entries \
             WHERE name IS NOT NULL AND instr({FOLD_FUNCTION}(name), ?1) > 0 \
             {NEWEST_FIRST}"
        );
        let entries = self.query(&sql, params![needle])?;
        debug!(term, count = entries.len(), "searched entries");
        Ok(entries)
    }

    fn get(&self, id: &EntryId) -> Result<DiaryEntry> {
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE id = ?1");
        self.context()?
            .query_row(&sql, params![id.to_string()], entry_from_row)
            .optional()?
            .ok_or(DiaryError::EntryNotFound(*id))
    }

    fn insert(&mut self, entry: &DiaryEntry) -> Result<()> {
        let created_at = date_key(&entry.date)?;
        let f = &entry.fields;

        let tx = self.context_mut()?.transaction()?;
        tx.execute(
            "INSERT INTO entries (id, created_at, name, distillery, abv, aged, cask, nose, \
             palate, finish, rating_score, image) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                entry.id.to_string(),
                created_at,
                f.name,
                f.distillery,
                f.abv,
                f.aged,
                f.cask,
                f.nose,
                f.palate,
                f.finish,
                f.rating_score,
                f.image,
            ],
        )?;
        tx.commit()?;

        info!(id = %entry.id, "entry inserted");
        Ok(())
    }

    fn update(&mut self, entry: &DiaryEntry) -> Result<DiaryEntry> {
        let f = &entry.fields;
        let sql = format!(
            "UPDATE entries SET name = ?2, distillery = ?3, abv = ?4, aged = ?5, cask = ?6, \
             nose = ?7, palate = ?8, finish = ?9, rating_score = ?10, image = ?11 \
             WHERE id = ?1 RETURNING {}",
            ENTRY_COLUMNS
        );

        let tx = self.context_mut()?.transaction()?;
        let stored = tx
            .query_row(
                &sql,
                params![
                    entry.id.to_string(),
                    f.name,
                    f.distillery,
                    f.abv,
                    f.aged,
                    f.cask,
                    f.nose,
                    f.palate,
                    f.finish,
                    f.rating_score,
                    f.image,
                ],
                entry_from_row,
            )
            .optional()?
            .ok_or(DiaryError::EntryNotFound(entry.id))?;
        tx.commit()?;

        info!(id = %entry.id, "entry updated");
        Ok(stored)
    }

    fn delete(&mut self, id: &EntryId) -> Result<DiaryEntry> {
        let sql = format!("DELETE FROM entries WHERE id = ?1 RETURNING {}", ENTRY_COLUMNS);

        let tx = self.context_mut()?.transaction()?;
        let removed = tx
            .query_row(&sql, params![id.to_string()], entry_from_row)
            .optional()?
            .ok_or(DiaryError::EntryNotFound(*id))?;
        tx.commit()?;

        info!(id = %id, "entry deleted");
        Ok(removed)
    }
}

fn date_key(date: &DateTime<Utc>) -> Result<i64> {
    date.timestamp_nanos_opt()
        .ok_or_else(|| DiaryError::Store(format!("date {} is outside the storable range", date)))
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<DiaryEntry> {
    let id: String = row.get(0)?;
    let id = Uuid::parse_str(&id)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;
    let created_at: i64 = row.get(1)?;

    Ok(DiaryEntry {
        id: EntryId(id),
        date: DateTime::from_timestamp_nanos(created_at),
        fields: EntryFields {
            name: row.get(2)?,
            distillery: row.get(3)?,
            abv: row.get(4)?,
            aged: row.get(5)?,
            cask: row.get(6)?,
            nose: row.get(7)?,
            palate: row.get(8)?,
            finish: row.get(9)?,
            rating_score: row.get(10)?,
            image: row.get(11)?,
        },
    })
}
