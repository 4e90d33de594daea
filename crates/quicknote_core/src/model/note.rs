//! Note domain model.
//!
//! # Responsibility
//! - Define `Note`, its identifier and the `NoteCollection` aggregate.
//! - Define `NoteInput` (create) and `NotePatch` (partial update) payloads.
//!
//! # Invariants
//! - Titles are non-empty after trimming.
//! - `NotePatch` never touches `id` or `owner_id`.
//! - Store-issued ids are fixed width, so string order equals creation order.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static NOTE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^note-(\d{1,19})$").expect("valid note id regex"));

/// Prefix shared by every store-issued note id.
pub const NOTE_ID_PREFIX: &str = "note-";
/// Digits used for the millisecond part of store-issued ids.
pub const NOTE_ID_MILLIS_WIDTH: usize = 13;

/// Stable note identifier.
///
/// Ordering is plain lexicographic string ordering, never numeric.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Wraps an existing identifier string without checking its format.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Builds a store-style id from epoch milliseconds.
    pub fn from_millis(millis: u64) -> Self {
        Self(format!(
            "{NOTE_ID_PREFIX}{millis:0width$}",
            width = NOTE_ID_MILLIS_WIDTH
        ))
    }

    /// Returns the millisecond component for store-style ids.
    ///
    /// Ids written by other tools (or by hand) yield `None`.
    pub fn millis(&self) -> Option<u64> {
        NOTE_ID_RE
            .captures(&self.0)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u64>().ok())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Validation failures for note payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Title is empty or whitespace only.
    EmptyTitle,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "note title cannot be empty"),
        }
    }
}

impl Error for NoteValidationError {}

/// A single user-authored note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    /// Missing in older blobs; decodes as empty.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub owner_id: String,
}

impl Note {
    /// Whether `owner_id` may see and change this note. Records written
    /// without an owner belong to whoever opens the slot.
    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id.is_empty() || self.owner_id == owner_id
    }
}

/// Create payload submitted by the edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteInput {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_pinned: bool,
}

impl NoteInput {
    /// Convenience constructor for an unpinned note.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            is_pinned: false,
        }
    }

    /// Returns the same input flagged as pinned.
    pub fn pinned(mut self) -> Self {
        self.is_pinned = true;
        self
    }

    /// Checks the title rule shared by create and update.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        validate_title(&self.title)
    }

    /// Full-field patch equivalent, used when the edit form saves.
    pub fn into_patch(self) -> NotePatch {
        NotePatch {
            title: Some(self.title),
            content: Some(self.content),
            is_pinned: Some(self.is_pinned),
        }
    }
}

impl From<&Note> for NoteInput {
    fn from(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
            is_pinned: note.is_pinned,
        }
    }
}

/// Partial update payload.
///
/// Merge rule: `Some` fields overwrite, `None` fields preserve the stored
/// value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_pinned: Option<bool>,
}

impl NotePatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn pinned(mut self, is_pinned: bool) -> Self {
        self.is_pinned = Some(is_pinned);
        self
    }

    /// Returns whether applying this patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.is_pinned.is_none()
    }

    /// Rejects a present-but-blank title. Absent titles are fine.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        match self.title.as_deref() {
            Some(title) => validate_title(title),
            None => Ok(()),
        }
    }

    /// Overlays present fields onto `note`.
    pub fn apply_to(&self, note: &mut Note) {
        if let Some(title) = &self.title {
            note.title = title.clone();
        }
        if let Some(content) = &self.content {
            note.content = content.clone();
        }
        if let Some(is_pinned) = self.is_pinned {
            note.is_pinned = is_pinned;
        }
    }
}

/// Persisted aggregate: every note plus a cached count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteCollection {
    /// Insertion order as stored. Display order is computed separately.
    pub data: Vec<Note>,
    pub count: usize,
}

impl NoteCollection {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a collection with a consistent count.
    pub fn from_notes(data: Vec<Note>) -> Self {
        let count = data.len();
        Self { data, count }
    }

    /// Recomputes `count` from `data`. Returns `true` when it had drifted.
    pub fn recount(&mut self) -> bool {
        let drifted = self.count != self.data.len();
        self.count = self.data.len();
        drifted
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Notes visible to `owner_id`, in insertion order.
    pub fn owned_by(&self, owner_id: &str) -> NoteCollection {
        Self::from_notes(
            self.data
                .iter()
                .filter(|note| note.is_owned_by(owner_id))
                .cloned()
                .collect(),
        )
    }

    pub fn position(&self, id: &NoteId) -> Option<usize> {
        self.data.iter().position(|note| &note.id == id)
    }

    pub fn find(&self, id: &NoteId) -> Option<&Note> {
        self.data.iter().find(|note| &note.id == id)
    }

    /// Newest store-issued id millisecond value, if any.
    pub fn newest_millis(&self) -> Option<u64> {
        self.data.iter().filter_map(|note| note.id.millis()).max()
    }
}

fn validate_title(title: &str) -> Result<(), NoteValidationError> {
    if title.trim().is_empty() {
        return Err(NoteValidationError::EmptyTitle);
    }
    Ok(())
}
