//! SQLite-backed slot storage.
//!
//! # Invariants
//! - One row per slot in `kv_slots`.
//! - `compare_and_swap` runs inside an IMMEDIATE transaction, so it is atomic
//!   across connections to the same file.

use super::{BlobStorage, StorageResult};
use crate::db::{open_db, open_db_in_memory};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;

const UPSERT_SLOT_SQL: &str = "INSERT INTO kv_slots (key, value, updated_at)
     VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
     ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at;";
const SELECT_SLOT_SQL: &str = "SELECT value FROM kv_slots WHERE key = ?1;";

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (and migrates) a slot database file.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a private in-memory slot database.
    pub fn open_in_memory() -> StorageResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }
}

impl BlobStorage for SqliteStorage {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn read(&self, slot: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(SELECT_SLOT_SQL, [slot], |row| row.get::<_, String>(0))
            .optional()?;
        Ok(value)
    }

    fn write(&mut self, slot: &str, blob: &str) -> StorageResult<()> {
        self.conn.execute(UPSERT_SLOT_SQL, params![slot, blob])?;
        Ok(())
    }

    fn remove(&mut self, slot: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_slots WHERE key = ?1;", [slot])?;
        Ok(())
    }

    fn compare_and_swap(
        &mut self,
        slot: &str,
        expected: Option<&str>,
        blob: &str,
    ) -> StorageResult<bool> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let current = tx
            .query_row(SELECT_SLOT_SQL, [slot], |row| row.get::<_, String>(0))
            .optional()?;
        if current.as_deref() != expected {
            return Ok(false);
        }
        tx.execute(UPSERT_SLOT_SQL, params![slot, blob])?;
        tx.commit()?;
        Ok(true)
    }
}
