//! Controller behind the notes grid.

use super::confirm::ConfirmationGate;
use super::events::{NoteAction, NoteEvent};
use super::form::FormState;
use super::ordering::sorted_for_display;
use crate::cache::{QueryCache, NOTES_QUERY_KEY};
use crate::model::note::{Note, NoteCollection, NoteId, NoteInput, NotePatch};
use crate::storage::BlobStorage;
use crate::store::clock::{Clock, SystemClock};
use crate::store::note_store::NoteStore;
use crate::store::StoreError;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DELETE_PROMPT: &str = "Are you sure you want to delete this note?";
const CLEAR_PROMPT: &str = "Are you sure you want to delete every note?";

pub type ControllerResult<T> = Result<T, ControllerError>;

#[derive(Debug)]
pub enum ControllerError {
    /// `save` was called while no form is open.
    FormClosed,
    Store(StoreError),
}

impl Display for ControllerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FormClosed => write!(f, "no note form is open"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ControllerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::FormClosed => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for ControllerError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteListView {
    /// Notes in display order.
    pub notes: Vec<Note>,
    /// True until the first successful load.
    pub is_loading: bool,
    pub form: FormState,
}

pub struct NoteListController<S: BlobStorage, C: Clock = SystemClock> {
    store: NoteStore<S, C>,
    cache: QueryCache<NoteCollection>,
    form: FormState,
    events: Vec<NoteEvent>,
}

impl<S: BlobStorage, C: Clock> NoteListController<S, C> {
    pub fn new(store: NoteStore<S, C>) -> Self {
        Self {
            store,
            cache: QueryCache::new(),
            form: FormState::Closed,
            events: Vec::new(),
        }
    }

    pub fn store(&self) -> &NoteStore<S, C> {
        &self.store
    }

    pub fn cache(&self) -> &QueryCache<NoteCollection> {
        &self.cache
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Current view model.
    ///
    /// A failed load is reported as a `Failed` event and falls back to the
    /// last loaded collection (or nothing, with `is_loading` still set).
    pub fn view(&mut self) -> NoteListView {
        let notes = match self.collection() {
            Ok(collection) => sorted_for_display(&collection.data),
            Err(err) => {
                self.fail(NoteAction::Load, &err);
                self.cache
                    .peek(NOTES_QUERY_KEY)
                    .map(|collection| sorted_for_display(&collection.data))
                    .unwrap_or_default()
            }
        };

        NoteListView {
            notes,
            is_loading: self.cache.is_loading(NOTES_QUERY_KEY),
            form: self.form.clone(),
        }
    }

    /// Collection through the query cache, in storage order.
    pub fn collection(&mut self) -> Result<NoteCollection, StoreError> {
        let store = &self.store;
        self.cache.fetch(NOTES_QUERY_KEY, || store.list())
    }

    /// "New note" intent.
    pub fn new_note(&mut self) {
        self.form = FormState::open_for_create();
        debug!("event=form_open module=controller status=ok mode=create");
    }

    /// "Edit" intent. Replaces any form that is already open.
    pub fn edit(&mut self, note: Note) {
        debug!(
            "event=form_open module=controller status=ok mode=edit note_id={}",
            note.id
        );
        self.form = FormState::open_for_edit(note);
    }

    /// "Cancel" intent. Discards the draft.
    pub fn cancel(&mut self) {
        self.form = FormState::Closed;
    }

    /// "Save" intent for whichever form is open.
    ///
    /// On success the form closes and the notes query is invalidated. On
    /// failure the form stays open with `input` as its draft.
    pub fn save(&mut self, input: NoteInput) -> ControllerResult<Note> {
        let (action, outcome) = match &self.form {
            FormState::Closed => return Err(ControllerError::FormClosed),
            FormState::OpenForCreate { .. } => (
                NoteAction::Create,
                input
                    .validate()
                    .map_err(StoreError::from)
                    .and_then(|()| self.store.create(input.clone())),
            ),
            FormState::OpenForEdit { note, .. } => {
                let id = note.id.clone();
                (
                    NoteAction::Update,
                    input
                        .validate()
                        .map_err(StoreError::from)
                        .and_then(|()| self.store.update(&id, &input.clone().into_patch())),
                )
            }
        };

        match outcome {
            Ok(note) => {
                self.cache.invalidate(NOTES_QUERY_KEY);
                self.form = FormState::Closed;
                self.events.push(match action {
                    NoteAction::Create => NoteEvent::Created(note.clone()),
                    _ => NoteEvent::Updated(note.clone()),
                });
                Ok(note)
            }
            Err(err) => {
                self.form.retain_draft(input);
                self.fail(action, &err);
                Err(err.into())
            }
        }
    }

    /// "Pin" intent: flips `is_pinned` of one note.
    pub fn toggle_pin(&mut self, id: &NoteId) -> ControllerResult<Note> {
        let outcome = self.store.get(id).and_then(|current| {
            self.store
                .update(id, &NotePatch::default().pinned(!current.is_pinned))
        });

        match outcome {
            Ok(note) => {
                self.cache.invalidate(NOTES_QUERY_KEY);
                self.events.push(NoteEvent::Updated(note.clone()));
                Ok(note)
            }
            Err(err) => {
                self.fail(NoteAction::Pin, &err);
                Err(err.into())
            }
        }
    }

    /// "Delete" intent. Returns `Ok(None)` when the gate declines.
    pub fn delete(
        &mut self,
        id: &NoteId,
        gate: &mut impl ConfirmationGate,
    ) -> ControllerResult<Option<Note>> {
        if !gate.confirm(DELETE_PROMPT) {
            info!(
                "event=note_delete module=controller status=declined note_id={}",
                id
            );
            return Ok(None);
        }

        match self.store.delete(id) {
            Ok(note) => {
                self.cache.invalidate(NOTES_QUERY_KEY);
                self.events.push(NoteEvent::Deleted(note.clone()));
                Ok(Some(note))
            }
            Err(err) => {
                self.fail(NoteAction::Delete, &err);
                Err(err.into())
            }
        }
    }

    /// Removes every note after confirmation. Returns `false` when declined.
    pub fn clear_all(&mut self, gate: &mut impl ConfirmationGate) -> ControllerResult<bool> {
        if !gate.confirm(CLEAR_PROMPT) {
            return Ok(false);
        }
        match self.store.clear() {
            Ok(()) => {
                self.cache.invalidate(NOTES_QUERY_KEY);
                self.form = FormState::Closed;
                Ok(true)
            }
            Err(err) => {
                self.fail(NoteAction::Delete, &err);
                Err(err.into())
            }
        }
    }

    /// Takes all queued outcome events, oldest first.
    pub fn drain_events(&mut self) -> Vec<NoteEvent> {
        std::mem::take(&mut self.events)
    }

    fn fail(&mut self, action: NoteAction, err: &StoreError) {
        self.events.push(NoteEvent::Failed {
            action,
            reason: err.to_string(),
        });
    }
}
