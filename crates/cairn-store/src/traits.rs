use async_trait::async_trait;
use bytes::Bytes;
use cairn_types::ContentId;
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;

/// Outcome of adding bytes to a content store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddResult {
    pub identifier: ContentId,
    pub size: u64,
}

/// Content-addressed store consumed by the pin coordinator.
///
/// Implementations must be safe to call concurrently, and `pin` must be
/// idempotent.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Upload bytes, optionally asking the store to pin them on arrival.
    async fn add(&self, bytes: Bytes, request_pin: bool) -> StoreResult<AddResult>;

    /// Ask the store to retain `identifier`.
    async fn pin(&self, identifier: &ContentId) -> StoreResult<()>;

    async fn is_pinned(&self, identifier: &ContentId) -> StoreResult<bool>;

    async fn get(&self, identifier: &ContentId) -> StoreResult<Bytes>;
}
