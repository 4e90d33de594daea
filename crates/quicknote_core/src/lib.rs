//! Core of the QuickNote notes list.
//! Owns the note blob, the query cache and the list controller; rendering and
//! notification display live outside this crate.

pub mod cache;
pub mod codec;
pub mod config;
pub mod controller;
pub mod db;
pub mod logging;
pub mod model;
pub mod storage;
pub mod store;

pub use cache::{QueryCache, NOTES_QUERY_KEY};
pub use codec::CodecError;
pub use config::{ConfigError, CorruptBlobPolicy, StoreConfig};
pub use controller::{
    AutoConfirm, ConfirmationGate, ControllerError, ControllerResult, FormState, NoteAction,
    NoteEvent, NoteListController, NoteListView,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, NoteCollection, NoteId, NoteInput, NotePatch, NoteValidationError};
pub use storage::{BlobStorage, FileStorage, MemoryStorage, SqliteStorage, StorageError};
pub use store::clock::{Clock, FixedClock, SystemClock};
pub use store::note_store::{NoteStore, DEFAULT_PAGE_LIMIT};
pub use store::{StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
