//! In-process slot storage.
//!
//! Clones share the same slot map, the way several views of one browser
//! profile share local storage.

use super::{BlobStorage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a slot with a raw blob, bypassing any codec.
    pub fn with_slot(self, slot: impl Into<String>, blob: impl Into<String>) -> Self {
        if let Ok(mut slots) = self.slots.lock() {
            slots.insert(slot.into(), blob.into());
        }
        self
    }

    fn slots(&self) -> StorageResult<MutexGuard<'_, HashMap<String, String>>> {
        self.slots
            .lock()
            .map_err(|_| StorageError::Unavailable("memory slot map poisoned".to_string()))
    }
}

impl BlobStorage for MemoryStorage {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn read(&self, slot: &str) -> StorageResult<Option<String>> {
        Ok(self.slots()?.get(slot).cloned())
    }

    fn write(&mut self, slot: &str, blob: &str) -> StorageResult<()> {
        self.slots()?.insert(slot.to_string(), blob.to_string());
        Ok(())
    }

    fn remove(&mut self, slot: &str) -> StorageResult<()> {
        self.slots()?.remove(slot);
        Ok(())
    }

    fn compare_and_swap(
        &mut self,
        slot: &str,
        expected: Option<&str>,
        blob: &str,
    ) -> StorageResult<bool> {
        let mut slots = self.slots()?;
        if slots.get(slot).map(String::as_str) != expected {
            return Ok(false);
        }
        slots.insert(slot.to_string(), blob.to_string());
        Ok(true)
    }
}
