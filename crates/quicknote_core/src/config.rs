//! Store configuration.
//!
//! # Responsibility
//! - Name the storage slot, the acting-user placeholder and the corrupt-blob
//!   policy used by `NoteStore`.
//! - Load and normalize configuration from JSON documents.
//!
//! # Invariants
//! - `slot` and `owner_id` are non-blank after normalization.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot name used when none is configured.
pub const DEFAULT_SLOT: &str = "user_notes";
/// Owner recorded on new notes; there is no real authentication.
pub const DEFAULT_OWNER_ID: &str = "current-user";

/// What to do when the persisted blob cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptBlobPolicy {
    /// Log a warning and treat the collection as empty. The next mutation
    /// overwrites the corrupt blob.
    #[default]
    ResetToEmpty,
    /// Fail reads and mutations with `StoreError::Corrupt`.
    Surface,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub slot: String,
    pub owner_id: String,
    pub corrupt_policy: CorruptBlobPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            slot: DEFAULT_SLOT.to_string(),
            owner_id: DEFAULT_OWNER_ID.to_string(),
            corrupt_policy: CorruptBlobPolicy::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    BlankField(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid store config: {err}"),
            Self::BlankField(field) => write!(f, "store config field `{field}` cannot be blank"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::BlankField(_) => None,
        }
    }
}

impl StoreConfig {
    /// Parses a JSON document; absent fields take their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let parsed: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        parsed.normalized()
    }

    pub fn with_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = slot.into();
        self
    }

    pub fn with_owner_id(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = owner_id.into();
        self
    }

    pub fn with_corrupt_policy(mut self, policy: CorruptBlobPolicy) -> Self {
        self.corrupt_policy = policy;
        self
    }

    /// Trims text fields and rejects blank ones.
    pub fn normalized(mut self) -> Result<Self, ConfigError> {
        self.slot = self.slot.trim().to_string();
        self.owner_id = self.owner_id.trim().to_string();
        if self.slot.is_empty() {
            return Err(ConfigError::BlankField("slot"));
        }
        if self.owner_id.is_empty() {
            return Err(ConfigError::BlankField("owner_id"));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CorruptBlobPolicy, StoreConfig, DEFAULT_OWNER_ID, DEFAULT_SLOT};

    #[test]
    fn empty_document_yields_defaults() {
        let config = StoreConfig::from_json_str("{}").unwrap();
        assert_eq!(config.slot, DEFAULT_SLOT);
        assert_eq!(config.owner_id, DEFAULT_OWNER_ID);
        assert_eq!(config.corrupt_policy, CorruptBlobPolicy::ResetToEmpty);
    }

    #[test]
    fn policy_and_slot_are_read_and_trimmed() {
        let config =
            StoreConfig::from_json_str(r#"{"slot":" work_notes ","corrupt_policy":"surface"}"#)
                .unwrap();
        assert_eq!(config.slot, "work_notes");
        assert_eq!(config.corrupt_policy, CorruptBlobPolicy::Surface);
    }

    #[test]
    fn blank_owner_is_rejected() {
        let err = StoreConfig::default()
            .with_owner_id("  ")
            .normalized()
            .unwrap_err();
        assert!(matches!(err, ConfigError::BlankField("owner_id")));
    }
}
