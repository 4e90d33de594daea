//! Notes list orchestration.
//!
//! # Responsibility
//! - Bridge user intents (new/edit/save/cancel/delete/pin) to the store.
//! - Keep the edit-form state and the outcome event queue.
//! - Hand sorted notes to the presentation layer.
//!
//! # Invariants
//! - Every successful mutation invalidates `NOTES_QUERY_KEY`.
//! - A failed intent changes neither the form state nor the collection.
//! - Deletion only happens after the confirmation gate agrees.

mod confirm;
mod events;
mod form;
mod note_list;
pub mod ordering;

pub use confirm::{AutoConfirm, ConfirmationGate};
pub use events::{NoteAction, NoteEvent};
pub use form::FormState;
pub use note_list::{ControllerError, ControllerResult, NoteListController, NoteListView};
