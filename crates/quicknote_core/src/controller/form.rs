//! Edit-form state machine.
//!
//! ```text
//! Closed --new--> OpenForCreate
//! Closed | OpenForEdit --edit(note)--> OpenForEdit(note)
//! OpenForCreate | OpenForEdit --save ok | cancel--> Closed
//! ```
//!
//! A failed save keeps the current state and stores the submitted draft.

use crate::model::note::{Note, NoteInput};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Closed,
    OpenForCreate {
        draft: NoteInput,
    },
    OpenForEdit {
        note: Note,
        draft: NoteInput,
    },
}

impl FormState {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Values the form should currently display.
    pub fn draft(&self) -> Option<&NoteInput> {
        match self {
            Self::Closed => None,
            Self::OpenForCreate { draft } | Self::OpenForEdit { draft, .. } => Some(draft),
        }
    }

    /// Note under edit, if any.
    pub fn editing(&self) -> Option<&Note> {
        match self {
            Self::OpenForEdit { note, .. } => Some(note),
            _ => None,
        }
    }

    pub(crate) fn open_for_create() -> Self {
        Self::OpenForCreate {
            draft: NoteInput::default(),
        }
    }

    pub(crate) fn open_for_edit(note: Note) -> Self {
        let draft = NoteInput::from(&note);
        Self::OpenForEdit { note, draft }
    }

    /// Keeps the user's input after a rejected save. No-op when closed.
    pub(crate) fn retain_draft(&mut self, submitted: NoteInput) {
        match self {
            Self::Closed => {}
            Self::OpenForCreate { draft } | Self::OpenForEdit { draft, .. } => *draft = submitted,
        }
    }
}
