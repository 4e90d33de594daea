//! Key-value storage port for persisted blobs.
//!
//! # Responsibility
//! - Define the `BlobStorage` contract the note store depends on.
//! - Provide memory, file and SQLite backends behind that contract.
//!
//! # Invariants
//! - A missing slot reads as `Ok(None)`, never as an error.
//! - `compare_and_swap` writes only when the current value equals `expected`.
//! - Backends store blobs verbatim; they never inspect the payload.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod file;
mod memory;
mod sqlite;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Transport-level storage failure.
#[derive(Debug)]
pub enum StorageError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Db(DbError),
    /// Slot name cannot be mapped onto the backend.
    InvalidSlot(String),
    /// Backend cannot be reached at all.
    Unavailable(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "storage io error at `{}`: {source}", path.display()),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidSlot(slot) => write!(f, "invalid storage slot name: `{slot}`"),
            Self::Unavailable(details) => write!(f, "storage unavailable: {details}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Db(err) => Some(err),
            Self::InvalidSlot(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Named-slot blob storage.
pub trait BlobStorage {
    /// Short backend label used in log events.
    fn backend_name(&self) -> &'static str;

    /// Reads the blob stored under `slot`.
    fn read(&self, slot: &str) -> StorageResult<Option<String>>;

    /// Replaces the blob stored under `slot`.
    fn write(&mut self, slot: &str, blob: &str) -> StorageResult<()>;

    /// Deletes `slot`. Removing a missing slot succeeds.
    fn remove(&mut self, slot: &str) -> StorageResult<()>;

    /// Writes `blob` only if the slot still holds `expected`.
    ///
    /// Returns `Ok(false)` without writing when the slot changed. The default
    /// implementation is only atomic for single-owner backends.
    fn compare_and_swap(
        &mut self,
        slot: &str,
        expected: Option<&str>,
        blob: &str,
    ) -> StorageResult<bool> {
        if self.read(slot)?.as_deref() != expected {
            return Ok(false);
        }
        self.write(slot, blob)?;
        Ok(true)
    }
}

impl<S: BlobStorage + ?Sized> BlobStorage for Box<S> {
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    fn read(&self, slot: &str) -> StorageResult<Option<String>> {
        (**self).read(slot)
    }

    fn write(&mut self, slot: &str, blob: &str) -> StorageResult<()> {
        (**self).write(slot, blob)
    }

    fn remove(&mut self, slot: &str) -> StorageResult<()> {
        (**self).remove(slot)
    }

    fn compare_and_swap(
        &mut self,
        slot: &str,
        expected: Option<&str>,
        blob: &str,
    ) -> StorageResult<bool> {
        (**self).compare_and_swap(slot, expected, blob)
    }
}
