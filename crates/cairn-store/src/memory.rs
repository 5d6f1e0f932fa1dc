use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use cairn_types::ContentId;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::{AddResult, ContentStore};

/// Identifier prefix for BLAKE3-addressed content.
pub const IDENTIFIER_PREFIX: &str = "b3";

/// In-memory, HashMap-based content store.
///
/// Intended for tests and embedding. Each operation class can be made to
/// fail on demand, and an artificial latency can be injected to exercise
/// caller deadlines. Counters record how the store was driven so tests can
/// assert on pin traffic.
pub struct InMemoryContentStore {
    inner: RwLock<StoreState>,
    faults: Faults,
    pin_requests: AtomicU64,
    pin_transitions: AtomicU64,
    status_checks: AtomicU64,
}

#[derive(Default)]
struct StoreState {
    blobs: HashMap<ContentId, Bytes>,
    pinned: HashSet<ContentId>,
}

#[derive(Default)]
struct Faults {
    uploads: AtomicBool,
    pins: AtomicBool,
    status: AtomicBool,
    reads: AtomicBool,
    latency_ms: AtomicU64,
}

impl InMemoryContentStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreState::default()),
            faults: Faults::default(),
            pin_requests: AtomicU64::new(0),
            pin_transitions: AtomicU64::new(0),
            status_checks: AtomicU64::new(0),
        }
    }

    /// Identifier the store assigns to `data`.
    pub fn identifier_for(data: &[u8]) -> ContentId {
        ContentId::new(format!(
            "{IDENTIFIER_PREFIX}{}",
            hex::encode(blake3::hash(data).as_bytes())
        ))
    }

    // ---- Fault injection ----

    pub fn fail_uploads(&self, fail: bool) {
        self.faults.uploads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_pins(&self, fail: bool) {
        self.faults.pins.store(fail, Ordering::SeqCst);
    }

    pub fn fail_status_checks(&self, fail: bool) {
        self.faults.status.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.faults.reads.store(fail, Ordering::SeqCst);
    }

    /// Delay every operation by `latency` before it touches state.
    pub fn set_latency(&self, latency: Duration) {
        self.faults
            .latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    // ---- Inspection ----

    /// Number of `pin` calls received, successful or not.
    pub fn pin_requests(&self) -> u64 {
        self.pin_requests.load(Ordering::SeqCst)
    }

    /// Number of unpinned → pinned transitions, from any source.
    pub fn pin_transitions(&self) -> u64 {
        self.pin_transitions.load(Ordering::SeqCst)
    }

    pub fn status_checks(&self) -> u64 {
        self.status_checks.load(Ordering::SeqCst)
    }

    /// Pin status without going through the fault-injected async path.
    pub fn contains_pin(&self, identifier: &ContentId) -> bool {
        self.inner
            .read()
            .expect("lock poisoned")
            .pinned
            .contains(identifier)
    }

    pub fn contains(&self, identifier: &ContentId) -> bool {
        self.inner
            .read()
            .expect("lock poisoned")
            .blobs
            .contains_key(identifier)
    }

    /// Insert bytes without pinning and without counting a request.
    pub fn insert_unpinned(&self, data: impl Into<Bytes>) -> ContentId {
        let data = data.into();
        let id = Self::identifier_for(&data);
        self.inner
            .write()
            .expect("lock poisoned")
            .blobs
            .entry(id.clone())
            .or_insert(data);
        id
    }

    /// Drop a pin, leaving the bytes collectable.
    pub fn unpin(&self, identifier: &ContentId) -> bool {
        self.inner
            .write()
            .expect("lock poisoned")
            .pinned
            .remove(identifier)
    }

    /// Remove every unpinned blob. Returns the number removed.
    pub fn collect_garbage(&self) -> usize {
        let mut state = self.inner.write().expect("lock poisoned");
        let StoreState { blobs, pinned } = &mut *state;
        let before = blobs.len();
        blobs.retain(|id, _| pinned.contains(id));
        before - blobs.len()
    }

    pub fn len(&self) -> usize {
        self.inner.read().expect("lock poisoned").blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pinned_count(&self) -> usize {
        self.inner.read().expect("lock poisoned").pinned.len()
    }

    async fn simulate_latency(&self) {
        let ms = self.faults.latency_ms.load(Ordering::SeqCst);
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }

    fn state_mut(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, StoreState>> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))
    }

    fn mark_pinned(&self, state: &mut StoreState, identifier: &ContentId) {
        if state.pinned.insert(identifier.clone()) {
            self.pin_transitions.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl Default for InMemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn add(&self, bytes: Bytes, request_pin: bool) -> StoreResult<AddResult> {
        self.simulate_latency().await;
        if self.faults.uploads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("upload refused".into()));
        }

        let identifier = Self::identifier_for(&bytes);
        let size = bytes.len() as u64;
        let mut state = self.state_mut()?;
        state.blobs.entry(identifier.clone()).or_insert(bytes);
        if request_pin {
            self.mark_pinned(&mut state, &identifier);
        }
        debug!(identifier = %identifier, size, request_pin, "content added");
        Ok(AddResult { identifier, size })
    }

    async fn pin(&self, identifier: &ContentId) -> StoreResult<()> {
        self.simulate_latency().await;
        self.pin_requests.fetch_add(1, Ordering::SeqCst);
        if self.faults.pins.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("pin service refused".into()));
        }

        let mut state = self.state_mut()?;
        if !state.blobs.contains_key(identifier) {
            return Err(StoreError::PinRejected {
                identifier: identifier.clone(),
                reason: "content not present".into(),
            });
        }
        self.mark_pinned(&mut state, identifier);
        Ok(())
    }

    async fn is_pinned(&self, identifier: &ContentId) -> StoreResult<bool> {
        self.simulate_latency().await;
        self.status_checks.fetch_add(1, Ordering::SeqCst);
        if self.faults.status.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("pin status unavailable".into()));
        }
        let state = self
            .inner
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        Ok(state.pinned.contains(identifier))
    }

    async fn get(&self, identifier: &ContentId) -> StoreResult<Bytes> {
        self.simulate_latency().await;
        if self.faults.reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("read refused".into()));
        }
        let state = self
            .inner
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        state
            .blobs
            .get(identifier)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(identifier.clone()))
    }
}

impl std::fmt::Debug for InMemoryContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryContentStore")
            .field("blob_count", &self.len())
            .field("pinned_count", &self.pinned_count())
            .finish()
    }
}
