use bytes::Bytes;
use cairn_types::{ContentId, ContentRecord, IntegrityHash};
use serde::{Deserialize, Serialize};

/// What to publish alongside the bytes.
#[derive(Clone, Debug, Default)]
pub struct PublishRequest {
    /// Upload name, for logs only.
    pub name: String,
    pub display_name: String,
    pub media_ref: String,
}

impl PublishRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_media_ref(mut self, media_ref: impl Into<String>) -> Self {
        self.media_ref = media_ref.into();
        self
    }
}

/// Result of a publish.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReceipt {
    pub identifier: ContentId,
    pub integrity_hash: IntegrityHash,
    pub size: u64,
    /// Whether pinning was confirmed at upload time.
    pub pinned: bool,
    /// Ledger sequence of the registry commit.
    pub seq: u64,
}

/// A record and the bytes it points at.
#[derive(Clone, Debug)]
pub struct FetchedContent {
    pub record: ContentRecord,
    pub bytes: Bytes,
}
