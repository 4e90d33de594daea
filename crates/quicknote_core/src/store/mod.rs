//! Note persistence layer.
//!
//! # Responsibility
//! - Own the read-modify-write lifecycle of the persisted note blob.
//! - Assign note ids and owner placeholders.
//!
//! # Invariants
//! - Only `NoteStore` touches the storage port.
//! - Every mutation rewrites the whole collection; there is no in-memory copy.

pub mod clock;
pub mod note_store;

use crate::codec::CodecError;
use crate::model::note::{NoteId, NoteValidationError};
use crate::storage::StorageError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures surfaced by `NoteStore` operations.
#[derive(Debug)]
pub enum StoreError {
    /// Target note id is absent from the collection.
    NotFound(NoteId),
    /// Target note belongs to another owner.
    Forbidden(NoteId),
    /// Payload rejected before touching storage.
    Validation(NoteValidationError),
    /// Storage transport failure.
    Storage(StorageError),
    /// Persisted blob could not be decoded (only with `CorruptBlobPolicy::Surface`).
    Corrupt(CodecError),
    /// Slot changed between this operation's read and its write.
    Conflict { slot: String },
}

impl StoreError {
    /// Stable short code used in log events and outcome reasons.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Forbidden(_) => "forbidden",
            Self::Validation(_) => "validation",
            Self::Storage(_) => "storage",
            Self::Corrupt(_) => "corrupt",
            Self::Conflict { .. } => "conflict",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::Forbidden(id) => write!(f, "note {id} belongs to another owner"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Corrupt(err) => write!(f, "{err}"),
            Self::Conflict { slot } => {
                write!(f, "slot `{slot}` was modified concurrently; reload and retry")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Corrupt(err) => Some(err),
            Self::NotFound(_) | Self::Forbidden(_) | Self::Conflict { .. } => None,
        }
    }
}

impl From<NoteValidationError> for StoreError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<CodecError> for StoreError {
    fn from(value: CodecError) -> Self {
        Self::Corrupt(value)
    }
}
