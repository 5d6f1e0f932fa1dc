use serde::{Deserialize, Serialize};

use crate::id::{ContentId, IntegrityHash, Owner};
use crate::temporal::Timestamp;

/// One registered piece of content.
///
/// A record is only ever constructed by the registry inside a committed
/// transaction; external code receives copies through `get_record`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub identifier: ContentId,
    pub integrity_hash: IntegrityHash,
    pub owner: Owner,
    pub created_at: Timestamp,
    pub display_name: String,
    /// Reference to associated media, typically another content identifier
    /// (`ipfs://…`, `/ipfs/…`, or bare). May be empty.
    pub media_ref: String,
}

impl ContentRecord {
    /// The displayed shape of this record.
    pub fn view(&self) -> RecordView {
        RecordView {
            identifier: self.identifier.clone(),
            integrity_hash: self.integrity_hash.clone(),
            created_at: self.created_at,
            display_name: self.display_name.clone(),
            media_ref: self.media_ref.clone(),
        }
    }
}

/// Record shape handed to display and export consumers.
///
/// Serializes with camelCase keys:
/// `{identifier, integrityHash, createdAt, displayName, mediaRef}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordView {
    pub identifier: ContentId,
    pub integrity_hash: IntegrityHash,
    pub created_at: Timestamp,
    pub display_name: String,
    pub media_ref: String,
}

impl From<&ContentRecord> for RecordView {
    fn from(record: &ContentRecord) -> Self {
        record.view()
    }
}
