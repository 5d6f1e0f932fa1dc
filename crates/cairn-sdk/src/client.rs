use std::sync::Arc;

use bytes::Bytes;
use cairn_crypto::IntegrityHasher;
use cairn_ledger::{InMemoryLedger, Ledger};
use cairn_pin::{PinCoordinator, PinStatsSnapshot, PostFetchHook};
use cairn_registry::{MetadataRegistry, NewRecord, RegistryError};
use cairn_store::{ContentStore, InMemoryContentStore};
use cairn_types::{ContentId, ContentRecord, IntegrityHash, Owner, RecordView};
use tracing::{debug, info};

use crate::config::CairnConfig;
use crate::error::SdkResult;
use crate::publish::{FetchedContent, PublishReceipt, PublishRequest};

/// A Cairn instance: registry, pin coordinator, and read hook.
///
/// Constructed once from a [`CairnConfig`] and passed to whatever needs it.
/// `dispose` consumes the handle.
pub struct Cairn<L = InMemoryLedger> {
    config: CairnConfig,
    registry: MetadataRegistry<L>,
    pins: Arc<PinCoordinator>,
    hook: Arc<dyn PostFetchHook>,
}

impl Cairn<InMemoryLedger> {
    /// Initialize with in-memory ledger and content store.
    pub fn initialize(config: CairnConfig) -> SdkResult<Self> {
        let ledger = Arc::new(InMemoryLedger::new(&config.ledger));
        let store: Arc<dyn ContentStore> = Arc::new(InMemoryContentStore::new());
        Self::with_backends(config, ledger, store)
    }
}

impl<L: Ledger> Cairn<L> {
    pub fn with_backends(
        config: CairnConfig,
        ledger: Arc<L>,
        store: Arc<dyn ContentStore>,
    ) -> SdkResult<Self> {
        config.validate()?;
        let pins = Arc::new(PinCoordinator::new(store, config.pinning.clone()));
        let hook: Arc<dyn PostFetchHook> = pins.clone();
        info!(
            pin_on_read = config.pinning.pin_on_read,
            request_timeout_ms = config.pinning.request_timeout_ms,
            "cairn initialized"
        );
        Ok(Self {
            config,
            registry: MetadataRegistry::new(ledger),
            pins,
            hook,
        })
    }

    /// Replace the post-fetch hook. The default pins on read.
    pub fn with_hook(mut self, hook: Arc<dyn PostFetchHook>) -> Self {
        self.hook = hook;
        self
    }

    // ---- Producer flow ----

    /// Upload `bytes`, pin them, and register the resulting identifier
    /// under `owner`.
    ///
    /// The integrity hash is the digest of the identifier the store assigns.
    /// Nothing is uploaded when `owner` is empty.
    pub async fn publish(
        &self,
        owner: &Owner,
        bytes: Bytes,
        request: PublishRequest,
    ) -> SdkResult<PublishReceipt> {
        if owner.is_empty() {
            return Err(RegistryError::Validation("caller must not be empty".into()).into());
        }

        let upload = self
            .pins
            .upload_and_ensure_pinned(bytes, &request.name)
            .await?;
        let integrity_hash = IntegrityHasher::digest_id(&upload.identifier);
        let record = NewRecord::new(upload.identifier.clone(), integrity_hash.clone())
            .with_display_name(request.display_name)
            .with_media_ref(request.media_ref);
        let accepted = self.registry.store(owner, record)?;

        info!(
            %owner,
            identifier = %upload.identifier,
            seq = accepted.seq,
            pinned = upload.pinned,
            "content published"
        );
        Ok(PublishReceipt {
            identifier: upload.identifier,
            integrity_hash,
            size: upload.size,
            pinned: upload.pinned,
            seq: accepted.seq,
        })
    }

    // ---- Consumer flow ----

    /// Look up the record, then read the bytes while the post-fetch hook
    /// runs alongside.
    pub async fn fetch(&self, identifier: &ContentId) -> SdkResult<FetchedContent> {
        let record = self.registry.get_record(identifier)?;
        let ((), bytes) = tokio::join!(self.hook.after_fetch(&record), self.pins.fetch(identifier));
        debug!(%identifier, "content fetched");
        Ok(FetchedContent {
            record,
            bytes: bytes?,
        })
    }

    /// Consumer-facing view of a record. Runs the post-fetch hook.
    pub async fn view(&self, identifier: &ContentId) -> SdkResult<RecordView> {
        Ok(self.read_record(identifier).await?.view())
    }

    /// Check a claimed hash against the registry.
    pub fn verify(&self, identifier: &ContentId, hash: &IntegrityHash) -> bool {
        self.registry.verify(identifier, hash)
    }

    /// Operator-triggered pin.
    pub async fn pin(&self, identifier: &ContentId) -> bool {
        self.pins.manual_pin(identifier).await
    }

    // ---- Accessors ----

    pub fn config(&self) -> &CairnConfig {
        &self.config
    }

    pub fn registry(&self) -> &MetadataRegistry<L> {
        &self.registry
    }

    pub fn pins(&self) -> &PinCoordinator {
        &self.pins
    }

    /// Shut down, returning the final pin counters.
    pub fn dispose(self) -> PinStatsSnapshot {
        let stats = self.pins.stats();
        info!(
            uploads = stats.uploads,
            pin_requests = stats.pin_requests,
            pin_failures = stats.pin_failures,
            "cairn disposed"
        );
        stats
    }

    async fn read_record(&self, identifier: &ContentId) -> SdkResult<ContentRecord> {
        let record = self.registry.get_record(identifier)?;
        self.hook.after_fetch(&record).await;
        debug!(%identifier, "record read");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use cairn_pin::{NoOpHook, PinConfig};

    use super::*;
    use crate::error::SdkError;

    fn cairn() -> Cairn {
        Cairn::initialize(CairnConfig::default()).unwrap()
    }

    #[test]
    fn initialize_rejects_invalid_config() {
        let mut config = CairnConfig::default();
        config.pinning.request_timeout_ms = 0;
        assert!(matches!(Cairn::initialize(config), Err(SdkError::Config(_))));
    }

    #[tokio::test]
    async fn publish_registers_digest_of_identifier() {
        let c = cairn();
        let alice = Owner::from("0xalice");
        let receipt = c
            .publish(&alice, Bytes::from_static(b"{\"name\":\"cat\"}"), PublishRequest::new("cat.json"))
            .await
            .unwrap();

        assert!(receipt.pinned);
        assert_eq!(receipt.seq, 1);
        assert_eq!(receipt.integrity_hash, IntegrityHasher::digest_id(&receipt.identifier));
        assert!(c.verify(&receipt.identifier, &receipt.integrity_hash));
        assert_eq!(
            c.registry().lookup_by_hash(&receipt.integrity_hash).unwrap(),
            Some(receipt.identifier.clone())
        );
        assert_eq!(c.registry().list_owned(&alice).unwrap(), vec![receipt.identifier]);
    }

    #[tokio::test]
    async fn publish_with_empty_owner_uploads_nothing() {
        let c = cairn();
        let err = c
            .publish(&Owner::from(""), Bytes::from_static(b"x"), PublishRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::Registry(RegistryError::Validation(_))));
        assert_eq!(c.pins().stats().uploads, 0);
    }

    #[tokio::test]
    async fn publishing_same_bytes_twice_conflicts() {
        let c = cairn();
        let alice = Owner::from("0xalice");
        c.publish(&alice, Bytes::from_static(b"same"), PublishRequest::default())
            .await
            .unwrap();
        let err = c
            .publish(&alice, Bytes::from_static(b"same"), PublishRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::Registry(RegistryError::Conflict { .. })));
    }

    #[tokio::test]
    async fn fetch_returns_record_and_bytes() {
        let c = cairn();
        let receipt = c
            .publish(
                &Owner::from("0xalice"),
                Bytes::from_static(b"payload"),
                PublishRequest::new("p").with_display_name("Payload"),
            )
            .await
            .unwrap();

        let fetched = c.fetch(&receipt.identifier).await.unwrap();
        assert_eq!(fetched.bytes, Bytes::from_static(b"payload"));
        assert_eq!(fetched.record.display_name, "Payload");

        let view = c.view(&receipt.identifier).await.unwrap();
        assert_eq!(view.integrity_hash, receipt.integrity_hash);
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_reads_while_pinning() {
        let store = Arc::new(InMemoryContentStore::new());
        let ledger = Arc::new(InMemoryLedger::default());
        let c = Cairn::with_backends(CairnConfig::default(), ledger, store.clone()).unwrap();
        let media = store.insert_unpinned(&b"image"[..]);
        let id = store.insert_unpinned(&b"meta"[..]);
        c.registry()
            .store(
                &Owner::from("0xalice"),
                NewRecord::new(id.clone(), IntegrityHasher::digest_id(&id))
                    .with_media_ref(format!("ipfs://{media}")),
            )
            .unwrap();
        store.set_latency(Duration::from_millis(100));

        let started = tokio::time::Instant::now();
        let fetched = c.fetch(&id).await.unwrap();

        assert_eq!(fetched.bytes, Bytes::from_static(b"meta"));
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(200));
        assert!(elapsed < Duration::from_millis(300), "{elapsed:?}");
        assert!(store.contains_pin(&id));
        assert!(store.contains_pin(&media));
    }

    #[tokio::test]
    async fn fetch_unknown_is_not_found() {
        let err = cairn().fetch(&ContentId::from("nope")).await.unwrap_err();
        assert!(matches!(err, SdkError::Registry(RegistryError::NotFound(_))));
    }

    #[tokio::test]
    async fn noop_hook_skips_read_pinning() {
        let store = Arc::new(InMemoryContentStore::new());
        let ledger = Arc::new(InMemoryLedger::default());
        let c = Cairn::with_backends(CairnConfig::default(), ledger, store.clone())
            .unwrap()
            .with_hook(Arc::new(NoOpHook));

        let id = store.insert_unpinned(&b"loose"[..]);
        c.registry()
            .store(&Owner::from("0xalice"), NewRecord::new(id.clone(), IntegrityHasher::digest_id(&id)))
            .unwrap();

        c.view(&id).await.unwrap();
        assert!(!store.contains_pin(&id));
    }

    #[tokio::test]
    async fn dispose_returns_counters() {
        let config = CairnConfig {
            pinning: PinConfig {
                redundant_pin_on_upload: false,
                ..PinConfig::default()
            },
            ..CairnConfig::default()
        };
        let c = Cairn::initialize(config).unwrap();
        c.publish(&Owner::from("0xalice"), Bytes::from_static(b"a"), PublishRequest::default())
            .await
            .unwrap();

        let stats = c.dispose();
        assert_eq!(stats.uploads, 1);
        assert_eq!(stats.pin_requests, 0);
    }
}
