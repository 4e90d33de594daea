//! Resource-keyed query cache.
//!
//! # Responsibility
//! - Hold the last fetched value per logical key (e.g. `"notes"`).
//! - Reload through the caller's loader after `invalidate`.
//!
//! # Invariants
//! - `fetch` on a fresh entry never calls the loader.
//! - A failed load keeps the previous value but leaves the entry stale.
//! - Invalidation is explicit: mutations do not reach this cache on their own.

use log::debug;
use std::collections::HashMap;

/// Key under which the note collection is cached.
pub const NOTES_QUERY_KEY: &str = "notes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryState {
    Fresh,
    Stale,
    Loading,
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: Option<V>,
    state: EntryState,
}

#[derive(Debug, Clone)]
pub struct QueryCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
}

impl<V> Default for QueryCache<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V: Clone> QueryCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key`, loading it first when the entry is
    /// missing or stale.
    pub fn fetch<E>(&mut self, key: &str, loader: impl FnOnce() -> Result<V, E>) -> Result<V, E> {
        if let Some(CacheEntry {
            value: Some(value),
            state: EntryState::Fresh,
        }) = self.entries.get(key)
        {
            debug!("event=query_fetch module=cache status=hit key={key}");
            return Ok(value.clone());
        }

        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert(CacheEntry {
                value: None,
                state: EntryState::Stale,
            });
        entry.state = EntryState::Loading;

        match loader() {
            Ok(value) => {
                entry.value = Some(value.clone());
                entry.state = EntryState::Fresh;
                debug!("event=query_fetch module=cache status=loaded key={key}");
                Ok(value)
            }
            Err(err) => {
                entry.state = EntryState::Stale;
                debug!("event=query_fetch module=cache status=error key={key}");
                Err(err)
            }
        }
    }

    /// Marks `key` stale so the next `fetch` reloads it.
    pub fn invalidate(&mut self, key: &str) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.state = EntryState::Stale;
            debug!("event=query_invalidate module=cache status=ok key={key}");
        }
    }

    pub fn invalidate_all(&mut self) {
        for entry in self.entries.values_mut() {
            entry.state = EntryState::Stale;
        }
    }

    /// Last loaded value, fresh or stale, without loading.
    pub fn peek(&self, key: &str) -> Option<&V> {
        self.entries.get(key).and_then(|entry| entry.value.as_ref())
    }

    pub fn is_stale(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .map_or(true, |entry| entry.state != EntryState::Fresh)
    }

    /// True until a first value has been loaded for `key`, and while a load
    /// is in flight.
    pub fn is_loading(&self, key: &str) -> bool {
        match self.entries.get(key) {
            None => true,
            Some(entry) => entry.value.is_none() || entry.state == EntryState::Loading,
        }
    }
}
