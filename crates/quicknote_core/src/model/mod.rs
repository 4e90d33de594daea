//! Domain model for the notes list.
//!
//! # Responsibility
//! - Define the note record and the persisted collection aggregate.
//! - Define create/update payloads and their validation rules.
//!
//! # Invariants
//! - A `NoteId` is assigned once by the store and never reassigned.
//! - `NoteCollection::count` always equals `NoteCollection::data.len()`.

pub mod note;
