//! Note collection blob codec.
//!
//! # Responsibility
//! - Encode a `NoteCollection` into the flat JSON blob kept in one slot.
//! - Decode that blob back, tolerating missing optional note fields.
//!
//! # Invariants
//! - Decoded collections always satisfy `count == data.len()`.
//! - No versioning: structurally different shapes are rejected, not migrated.

use crate::model::note::NoteCollection;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Blob that cannot be decoded as a note collection.
#[derive(Debug)]
pub struct CodecError {
    source: serde_json::Error,
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "corrupt note blob at line {} column {}: {}",
            self.source.line(),
            self.source.column(),
            self.source
        )
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(value: serde_json::Error) -> Self {
        Self { source: value }
    }
}

/// Serializes the whole collection.
///
/// `count` is written from `data.len()`, never from the stored field.
pub fn encode(collection: &NoteCollection) -> Result<String, CodecError> {
    let mut snapshot = collection.clone();
    snapshot.recount();
    Ok(serde_json::to_string(&snapshot)?)
}

/// Parses a persisted blob.
pub fn decode(blob: &str) -> Result<NoteCollection, CodecError> {
    let mut collection: NoteCollection = serde_json::from_str(blob)?;
    let stored_count = collection.count;
    if collection.recount() {
        warn!(
            "event=blob_decode module=codec status=recovered reason=count_drift stored_count={} actual_count={}",
            stored_count, collection.count
        );
    }
    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::{decode, encode};
    use crate::model::note::{Note, NoteCollection, NoteId};

    #[test]
    fn decode_fills_missing_optional_fields() {
        let blob = r#"{"data":[{"id":"note-1","title":"only title"}],"count":1}"#;
        let collection = decode(blob).unwrap();

        let note = &collection.data[0];
        assert_eq!(note.content, "");
        assert!(!note.is_pinned);
        assert_eq!(note.owner_id, "");
    }

    #[test]
    fn decode_repairs_count_drift() {
        let blob = r#"{"data":[],"count":4}"#;
        assert_eq!(decode(blob).unwrap().count, 0);
    }

    #[test]
    fn decode_rejects_other_shapes() {
        assert!(decode("not json").is_err());
        assert!(decode(r#"{"notes":[]}"#).is_err());
        assert!(decode(r#"[1,2,3]"#).is_err());
    }

    #[test]
    fn encode_writes_the_expected_layout() {
        let collection = NoteCollection {
            data: vec![Note {
                id: NoteId::new("note-1"),
                title: "t".to_string(),
                content: "c".to_string(),
                is_pinned: true,
                owner_id: "current-user".to_string(),
            }],
            count: 0,
        };

        let value: serde_json::Value = serde_json::from_str(&encode(&collection).unwrap()).unwrap();
        assert_eq!(value["count"], 1);
        assert_eq!(value["data"][0]["id"], "note-1");
        assert_eq!(value["data"][0]["is_pinned"], true);
        assert_eq!(value["data"][0]["owner_id"], "current-user");
    }
}
