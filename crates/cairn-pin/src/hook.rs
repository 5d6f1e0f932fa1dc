use async_trait::async_trait;
use cairn_types::ContentRecord;
use tracing::debug;

use crate::coordinator::PinCoordinator;

/// Invoked by the read path after a record has been fetched.
///
/// Implementations must not fail the read; anything they do is best effort.
#[async_trait]
pub trait PostFetchHook: Send + Sync {
    async fn after_fetch(&self, record: &ContentRecord);
}

pub struct NoOpHook;

#[async_trait]
impl PostFetchHook for NoOpHook {
    async fn after_fetch(&self, _record: &ContentRecord) {}
}

#[async_trait]
impl PostFetchHook for PinCoordinator {
    async fn after_fetch(&self, record: &ContentRecord) {
        let report = self.opportunistic_pin_on_read(record).await;
        debug!(
            identifier = %record.identifier,
            targets = report.outcomes.len(),
            all_pinned = report.all_pinned(),
            "post-fetch pin pass"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cairn_store::InMemoryContentStore;
    use cairn_types::{IntegrityHash, Owner, Timestamp};

    use super::*;
    use crate::config::PinConfig;

    fn record(identifier: cairn_types::ContentId) -> ContentRecord {
        ContentRecord {
            identifier,
            integrity_hash: IntegrityHash::from("h"),
            owner: Owner::from("0xalice"),
            created_at: Timestamp::zero(),
            display_name: String::new(),
            media_ref: String::new(),
        }
    }

    #[tokio::test]
    async fn noop_hook_does_nothing() {
        let store = InMemoryContentStore::new();
        let id = store.insert_unpinned(&b"x"[..]);
        NoOpHook.after_fetch(&record(id.clone())).await;
        assert!(!store.contains_pin(&id));
    }

    #[tokio::test]
    async fn coordinator_hook_pins_fetched_record() {
        let store = Arc::new(InMemoryContentStore::new());
        let id = store.insert_unpinned(&b"x"[..]);
        let hook: Arc<dyn PostFetchHook> =
            Arc::new(PinCoordinator::new(store.clone(), PinConfig::default()));

        hook.after_fetch(&record(id.clone())).await;
        assert!(store.contains_pin(&id));
    }
}
