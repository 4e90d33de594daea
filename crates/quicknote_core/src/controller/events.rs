//! Outcome events handed to the notification layer.

use crate::model::note::Note;
use std::fmt::{Display, Formatter};

/// User intent an outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteAction {
    Load,
    Create,
    Update,
    Pin,
    Delete,
}

impl Display for NoteAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Load => "load",
            Self::Create => "create",
            Self::Update => "update",
            Self::Pin => "pin",
            Self::Delete => "delete",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteEvent {
    Created(Note),
    Updated(Note),
    Deleted(Note),
    Failed { action: NoteAction, reason: String },
}

impl NoteEvent {
    /// Short outcome name (`created`, `updated`, `deleted`, `failed`).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created(_) => "created",
            Self::Updated(_) => "updated",
            Self::Deleted(_) => "deleted",
            Self::Failed { .. } => "failed",
        }
    }
}

impl Display for NoteEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created(_) => write!(f, "Note created"),
            Self::Updated(_) => write!(f, "Note updated"),
            Self::Deleted(_) => write!(f, "Note deleted"),
            Self::Failed { action, reason } => write!(f, "Could not {action} note: {reason}"),
        }
    }
}
