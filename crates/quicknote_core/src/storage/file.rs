//! Directory-backed slot storage: one `<slot>.json` file per slot.
//!
//! # Invariants
//! - Writes go to a uniquely named temp file in the slot directory and are
//!   renamed into place, so readers never see a partial blob.
//! - Mutations of one slot hold an exclusive lock on `<slot>.lock`, which
//!   makes `compare_and_swap` atomic across threads and processes.
//! - Slot names are restricted to `[A-Za-z0-9_.-]` and cannot start with `.`.

use super::{BlobStorage, StorageError, StorageResult};
use fs2::FileExt;
use log::debug;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const SLOT_FILE_EXTENSION: &str = "json";
const LOCK_FILE_EXTENSION: &str = "lock";

#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

/// Exclusive hold on one slot. Dropping it closes the file and releases the
/// lock.
struct SlotLock {
    _file: File,
}

impl FileStorage {
    /// Uses `dir` as the slot directory. The directory is created lazily on
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file that backs `slot`.
    pub fn slot_path(&self, slot: &str) -> StorageResult<PathBuf> {
        validate_slot(slot)?;
        Ok(self.dir.join(format!("{slot}.{SLOT_FILE_EXTENSION}")))
    }

    fn lock_slot(&self, slot: &str) -> StorageResult<SlotLock> {
        validate_slot(slot)?;
        self.ensure_dir()?;
        let path = self.dir.join(format!("{slot}.{LOCK_FILE_EXTENSION}"));
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| StorageError::Io {
                path: path.clone(),
                source,
            })?;
        file.lock_exclusive()
            .map_err(|source| StorageError::Io { path, source })?;
        Ok(SlotLock { _file: file })
    }

    fn ensure_dir(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })
    }

    /// Replaces the slot file. Callers hold the slot lock.
    fn replace_locked(&self, path: &Path, blob: &str) -> StorageResult<()> {
        let io_err = |source: std::io::Error| StorageError::Io {
            path: self.dir.clone(),
            source,
        };
        let mut temp = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        temp.write_all(blob.as_bytes()).map_err(io_err)?;
        temp.as_file().sync_all().map_err(io_err)?;
        temp.persist(path).map_err(|err| StorageError::Io {
            path: path.to_path_buf(),
            source: err.error,
        })?;

        debug!(
            "event=slot_write module=storage backend=file status=ok bytes={}",
            blob.len()
        );
        Ok(())
    }
}

impl BlobStorage for FileStorage {
    fn backend_name(&self) -> &'static str {
        "file"
    }

    fn read(&self, slot: &str) -> StorageResult<Option<String>> {
        let path = self.slot_path(slot)?;
        match fs::read_to_string(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn write(&mut self, slot: &str, blob: &str) -> StorageResult<()> {
        let path = self.slot_path(slot)?;
        let _lock = self.lock_slot(slot)?;
        self.replace_locked(&path, blob)
    }

    fn remove(&mut self, slot: &str) -> StorageResult<()> {
        let path = self.slot_path(slot)?;
        let _lock = self.lock_slot(slot)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn compare_and_swap(
        &mut self,
        slot: &str,
        expected: Option<&str>,
        blob: &str,
    ) -> StorageResult<bool> {
        let path = self.slot_path(slot)?;
        let _lock = self.lock_slot(slot)?;
        if self.read(slot)?.as_deref() != expected {
            debug!("event=slot_cas module=storage backend=file status=mismatch");
            return Ok(false);
        }
        self.replace_locked(&path, blob)?;
        Ok(true)
    }
}

fn validate_slot(slot: &str) -> StorageResult<()> {
    let valid = !slot.is_empty()
        && !slot.starts_with('.')
        && slot
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidSlot(slot.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::validate_slot;

    #[test]
    fn slot_names_cannot_escape_the_directory() {
        assert!(validate_slot("user_notes").is_ok());
        assert!(validate_slot("notes-v1.backup").is_ok());
        assert!(validate_slot("../etc/passwd").is_err());
        assert!(validate_slot("a/b").is_err());
        assert!(validate_slot("").is_err());
        assert!(validate_slot(".hidden").is_err());
    }
}
