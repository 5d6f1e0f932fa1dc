use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use cairn_store::{ContentStore, StoreError, StoreResult};
use cairn_types::{ContentId, ContentRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::PinConfig;
use crate::error::{PinError, PinResult};
use crate::reference::extract_reference;
use crate::stats::{PinStats, PinStatsSnapshot};

/// Outcome of [`PinCoordinator::upload_and_ensure_pinned`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub identifier: ContentId,
    pub size: u64,
    /// `false` when the store took the bytes but pin confirmation failed.
    pub pinned: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinOutcome {
    pub identifier: ContentId,
    pub pinned: bool,
}

/// What a read-time pin pass did. Empty when read pinning is disabled.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinReport {
    pub outcomes: Vec<PinOutcome>,
}

impl PinReport {
    pub fn all_pinned(&self) -> bool {
        self.outcomes.iter().all(|o| o.pinned)
    }

    pub fn failed(&self) -> impl Iterator<Item = &ContentId> {
        self.outcomes
            .iter()
            .filter(|o| !o.pinned)
            .map(|o| &o.identifier)
    }
}

/// Coordinates pinning against a [`ContentStore`].
///
/// Stateless apart from counters, so it can be shared behind an `Arc` and
/// called from any number of tasks. Every store call runs under the
/// configured deadline.
pub struct PinCoordinator {
    store: Arc<dyn ContentStore>,
    config: PinConfig,
    stats: PinStats,
}

impl PinCoordinator {
    pub fn new(store: Arc<dyn ContentStore>, config: PinConfig) -> Self {
        Self {
            store,
            config,
            stats: PinStats::default(),
        }
    }

    pub fn stats(&self) -> PinStatsSnapshot {
        self.stats.snapshot()
    }

    /// Upload `bytes` with pin-on-add, then pin again explicitly.
    ///
    /// Fails only if the upload itself fails. A failed follow-up pin is
    /// reported through `pinned: false`.
    pub async fn upload_and_ensure_pinned(
        &self,
        bytes: Bytes,
        name: &str,
    ) -> PinResult<UploadReceipt> {
        self.stats.upload();
        let added = match self.deadline(self.store.add(bytes, true)).await {
            Ok(added) => added,
            Err(e) => {
                self.stats.upload_failure();
                warn!(name, error = %e, "upload failed");
                return Err(PinError::StoreUnavailable(e.to_string()));
            }
        };

        let pinned = if self.config.redundant_pin_on_upload {
            self.stats.pin_request();
            match self.deadline(self.store.pin(&added.identifier)).await {
                Ok(()) => true,
                Err(e) => {
                    self.stats.pin_failure();
                    warn!(
                        name,
                        identifier = %added.identifier,
                        error = %e,
                        "upload stored but redundant pin failed"
                    );
                    false
                }
            }
        } else {
            self.deadline(self.store.is_pinned(&added.identifier))
                .await
                .unwrap_or(false)
        };

        info!(
            name,
            identifier = %added.identifier,
            size = added.size,
            pinned,
            "content uploaded"
        );
        Ok(UploadReceipt {
            identifier: added.identifier,
            size: added.size,
            pinned,
        })
    }

    /// Make sure `identifier` is pinned. Never fails; problems are logged
    /// and reported as `false`.
    pub async fn ensure_pinned(&self, identifier: &ContentId) -> bool {
        match self.try_ensure_pinned(identifier).await {
            Ok(pinned) => pinned,
            Err(e) => {
                self.stats.pin_failure();
                warn!(error = %e, "ensure pinned failed");
                false
            }
        }
    }

    /// Like [`ensure_pinned`](Self::ensure_pinned), but surfaces the failure.
    ///
    /// Checks status first and only issues a pin request for content that is
    /// not already pinned. A failed status check falls through to the pin
    /// request, which the store treats idempotently.
    pub async fn try_ensure_pinned(&self, identifier: &ContentId) -> PinResult<bool> {
        if identifier.is_empty() {
            return Err(PinError::pin_failure(identifier, "empty identifier"));
        }

        match self.deadline(self.store.is_pinned(identifier)).await {
            Ok(true) => {
                self.stats.already_pinned();
                debug!(%identifier, "already pinned");
                return Ok(true);
            }
            Ok(false) => {}
            Err(e) => debug!(%identifier, error = %e, "pin status unknown, pinning anyway"),
        }

        self.stats.pin_request();
        self.deadline(self.store.pin(identifier))
            .await
            .map_err(|e| PinError::pin_failure(identifier, e.to_string()))?;
        debug!(%identifier, "pinned");
        Ok(true)
    }

    /// Pin the content behind `record` as a side effect of reading it.
    ///
    /// Covers the record's identifier and, when enabled, the identifier its
    /// media reference names. Both are pinned concurrently, so a slow store
    /// delays the read by one check-then-pin round at most. Never fails.
    pub async fn opportunistic_pin_on_read(&self, record: &ContentRecord) -> PinReport {
        if !self.config.pin_on_read {
            return PinReport::default();
        }

        let mut targets = self.references(record).into_iter();
        let (own, nested) = (targets.next(), targets.next());
        let (own, nested) = tokio::join!(self.pin_target(own), self.pin_target(nested));
        let report = PinReport {
            outcomes: own.into_iter().chain(nested).collect(),
        };
        if !report.all_pinned() {
            warn!(
                identifier = %record.identifier,
                failed = report.failed().count(),
                "read-time pinning incomplete"
            );
        }
        report
    }

    /// Operator-triggered pin of an arbitrary identifier.
    pub async fn manual_pin(&self, identifier: &ContentId) -> bool {
        info!(%identifier, "manual pin requested");
        self.ensure_pinned(identifier).await
    }

    /// Read bytes from the store under the request deadline.
    pub async fn fetch(&self, identifier: &ContentId) -> StoreResult<Bytes> {
        self.deadline(self.store.get(identifier)).await
    }

    /// Identifiers a read of `record` should keep pinned, deduplicated.
    /// At most two: the record's own and its media reference.
    pub fn references(&self, record: &ContentRecord) -> Vec<ContentId> {
        let mut targets = Vec::with_capacity(2);
        if !record.identifier.is_empty() {
            targets.push(record.identifier.clone());
        }
        if self.config.pin_nested_references {
            if let Some(nested) = extract_reference(&record.media_ref) {
                if !targets.contains(&nested) {
                    targets.push(nested);
                }
            }
        }
        targets
    }

    async fn pin_target(&self, identifier: Option<ContentId>) -> Option<PinOutcome> {
        let identifier = identifier?;
        let pinned = self.ensure_pinned(&identifier).await;
        Some(PinOutcome { identifier, pinned })
    }

    async fn deadline<T>(&self, call: impl Future<Output = StoreResult<T>>) -> StoreResult<T> {
        let timeout = self.config.request_timeout();
        tokio::time::timeout(timeout, call)
            .await
            .unwrap_or_else(|_| {
                Err(StoreError::Unavailable(format!(
                    "no response within {}ms",
                    timeout.as_millis()
                )))
            })
    }
}

impl std::fmt::Debug for PinCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinCoordinator")
            .field("config", &self.config)
            .field("stats", &self.stats.snapshot())
            .finish()
    }
}
