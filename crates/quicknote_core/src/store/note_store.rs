//! Note store over the blob storage port.
//!
//! # Responsibility
//! - Provide list/get/create/update/delete over one persisted slot.
//! - Assign ids (`note-<13-digit millis>`) and the owner placeholder.
//! - Scope reads and mutations to the configured owner.
//! - Apply the configured corrupt-blob policy on every read.
//!
//! # Invariants
//! - `count == data.len()` in every blob this store writes.
//! - Ids are strictly increasing within one collection.
//! - A failed operation writes nothing.
//! - Notes of other owners are never listed, changed or removed; targeting
//!   one by id yields `StoreError::Forbidden`.
//! - Writes are compare-and-swap against the blob observed at read time, so a
//!   concurrent writer yields `StoreError::Conflict` instead of a lost update.

use super::clock::{Clock, SystemClock};
use super::{StoreError, StoreResult};
use crate::codec;
use crate::config::{CorruptBlobPolicy, StoreConfig};
use crate::model::note::{Note, NoteCollection, NoteId, NoteInput, NotePatch};
use crate::storage::BlobStorage;
use log::{error, info, warn};

/// Page size used by `list_page` when the caller passes none.
pub const DEFAULT_PAGE_LIMIT: usize = 100;

/// Collection as read from storage plus the raw blob it came from.
struct Snapshot {
    raw: Option<String>,
    collection: NoteCollection,
}

pub struct NoteStore<S: BlobStorage, C: Clock = SystemClock> {
    storage: S,
    config: StoreConfig,
    clock: C,
}

impl<S: BlobStorage> NoteStore<S, SystemClock> {
    /// Creates a store with default configuration and the wall clock.
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, StoreConfig::default())
    }

    pub fn with_config(storage: S, config: StoreConfig) -> Self {
        Self {
            storage,
            config,
            clock: SystemClock,
        }
    }
}

impl<S: BlobStorage, C: Clock> NoteStore<S, C> {
    /// Replaces the id clock.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> NoteStore<S, C2> {
        NoteStore {
            storage: self.storage,
            config: self.config,
            clock,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Reads the owner's notes. A missing slot is an empty collection.
    pub fn list(&self) -> StoreResult<NoteCollection> {
        Ok(self.load()?.collection.owned_by(&self.config.owner_id))
    }

    /// Reads one window of the collection in insertion order.
    ///
    /// `limit` of `None` or `0` means `DEFAULT_PAGE_LIMIT`.
    pub fn list_page(&self, skip: usize, limit: Option<usize>) -> StoreResult<NoteCollection> {
        let limit = match limit {
            None | Some(0) => DEFAULT_PAGE_LIMIT,
            Some(value) => value,
        };
        let page = self
            .list()?
            .data
            .into_iter()
            .skip(skip)
            .take(limit)
            .collect();
        Ok(NoteCollection::from_notes(page))
    }

    /// Gets one note by id.
    pub fn get(&self, id: &NoteId) -> StoreResult<Note> {
        let collection = self.load()?.collection;
        let index = self.owned_position(&collection, id)?;
        Ok(collection.data[index].clone())
    }

    /// Appends a new note owned by the configured placeholder user.
    pub fn create(&mut self, input: NoteInput) -> StoreResult<Note> {
        let result = self.try_create(input);
        self.log_outcome("note_create", None, &result);
        result
    }

    /// Merges `patch` over the note with `id`.
    pub fn update(&mut self, id: &NoteId, patch: &NotePatch) -> StoreResult<Note> {
        let result = self.try_update(id, patch);
        self.log_outcome("note_update", Some(id), &result);
        result
    }

    /// Removes the note with `id` and returns it.
    pub fn delete(&mut self, id: &NoteId) -> StoreResult<Note> {
        let result = self.try_delete(id);
        self.log_outcome("note_delete", Some(id), &result);
        result
    }

    /// Removes every note of the owner. The slot itself is dropped once no
    /// other owner's notes remain. The next `list` returns an empty
    /// collection.
    pub fn clear(&mut self) -> StoreResult<()> {
        let result = self.try_clear();
        let backend = self.storage.backend_name();
        match &result {
            Ok(removed) => info!(
                "event=notes_clear module=store status=ok backend={} removed={}",
                backend, removed
            ),
            Err(err) => warn!(
                "event=notes_clear module=store status=error backend={} error_code={} error={}",
                backend,
                err.code(),
                err
            ),
        }
        result.map(|_| ())
    }

    fn try_create(&mut self, input: NoteInput) -> StoreResult<Note> {
        input.validate()?;
        let Snapshot {
            raw,
            mut collection,
        } = self.load()?;

        let note = Note {
            id: self.next_id(&collection),
            title: input.title,
            content: input.content,
            is_pinned: input.is_pinned,
            owner_id: self.config.owner_id.clone(),
        };
        collection.data.push(note.clone());
        collection.recount();

        self.persist(raw, &collection)?;
        Ok(note)
    }

    fn try_update(&mut self, id: &NoteId, patch: &NotePatch) -> StoreResult<Note> {
        patch.validate()?;
        let Snapshot {
            raw,
            mut collection,
        } = self.load()?;

        let index = self.owned_position(&collection, id)?;
        patch.apply_to(&mut collection.data[index]);
        let updated = collection.data[index].clone();

        self.persist(raw, &collection)?;
        Ok(updated)
    }

    fn try_delete(&mut self, id: &NoteId) -> StoreResult<Note> {
        let Snapshot {
            raw,
            mut collection,
        } = self.load()?;

        let index = self.owned_position(&collection, id)?;
        let removed = collection.data.remove(index);
        collection.recount();

        self.persist(raw, &collection)?;
        Ok(removed)
    }

    fn try_clear(&mut self) -> StoreResult<usize> {
        let Snapshot {
            raw,
            mut collection,
        } = self.load()?;

        let before = collection.data.len();
        let owner_id = &self.config.owner_id;
        collection.data.retain(|note| !note.is_owned_by(owner_id));
        let removed = before - collection.data.len();

        if collection.data.is_empty() {
            self.storage.remove(&self.config.slot)?;
        } else if removed > 0 {
            collection.recount();
            self.persist(raw, &collection)?;
        }
        Ok(removed)
    }

    /// Index of `id` when it exists and belongs to the configured owner.
    fn owned_position(&self, collection: &NoteCollection, id: &NoteId) -> StoreResult<usize> {
        let index = collection
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        if !collection.data[index].is_owned_by(&self.config.owner_id) {
            return Err(StoreError::Forbidden(id.clone()));
        }
        Ok(index)
    }

    fn load(&self) -> StoreResult<Snapshot> {
        let raw = self.storage.read(&self.config.slot)?;
        let collection = match raw.as_deref() {
            None => NoteCollection::empty(),
            Some(blob) => match codec::decode(blob) {
                Ok(collection) => collection,
                Err(err) => match self.config.corrupt_policy {
                    CorruptBlobPolicy::ResetToEmpty => {
                        warn!(
                            "event=notes_read module=store status=recovered backend={} reason=corrupt_blob bytes={} error={}",
                            self.storage.backend_name(),
                            blob.len(),
                            err
                        );
                        NoteCollection::empty()
                    }
                    CorruptBlobPolicy::Surface => {
                        error!(
                            "event=notes_read module=store status=error backend={} error_code=corrupt error={}",
                            self.storage.backend_name(),
                            err
                        );
                        return Err(err.into());
                    }
                },
            },
        };
        Ok(Snapshot { raw, collection })
    }

    fn persist(&mut self, expected: Option<String>, collection: &NoteCollection) -> StoreResult<()> {
        let blob = codec::encode(collection)?;
        let swapped =
            self.storage
                .compare_and_swap(&self.config.slot, expected.as_deref(), &blob)?;
        if !swapped {
            return Err(StoreError::Conflict {
                slot: self.config.slot.clone(),
            });
        }
        Ok(())
    }

    fn next_id(&self, collection: &NoteCollection) -> NoteId {
        let now = self.clock.now_millis();
        let millis = match collection.newest_millis() {
            Some(newest) if newest >= now => newest + 1,
            _ => now,
        };
        NoteId::from_millis(millis)
    }

    fn log_outcome(&self, event: &str, target: Option<&NoteId>, result: &StoreResult<Note>) {
        let backend = self.storage.backend_name();
        match result {
            Ok(note) => info!(
                "event={} module=store status=ok backend={} note_id={}",
                event, backend, note.id
            ),
            Err(err) => warn!(
                "event={} module=store status=error backend={} note_id={} error_code={} error={}",
                event,
                backend,
                target.map_or("-", NoteId::as_str),
                err.code(),
                err
            ),
        }
    }
}
