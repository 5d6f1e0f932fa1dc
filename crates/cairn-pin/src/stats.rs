use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Counters for pin coordinator activity.
#[derive(Debug, Default)]
pub struct PinStats {
    uploads: AtomicU64,
    upload_failures: AtomicU64,
    pin_requests: AtomicU64,
    already_pinned: AtomicU64,
    pin_failures: AtomicU64,
}

/// Point-in-time copy of [`PinStats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinStatsSnapshot {
    pub uploads: u64,
    pub upload_failures: u64,
    pub pin_requests: u64,
    pub already_pinned: u64,
    pub pin_failures: u64,
}

impl PinStats {
    pub(crate) fn upload(&self) {
        self.uploads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn upload_failure(&self) {
        self.upload_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn pin_request(&self) {
        self.pin_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn already_pinned(&self) {
        self.already_pinned.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn pin_failure(&self) {
        self.pin_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> PinStatsSnapshot {
        PinStatsSnapshot {
            uploads: self.uploads.load(Ordering::Relaxed),
            upload_failures: self.upload_failures.load(Ordering::Relaxed),
            pin_requests: self.pin_requests.load(Ordering::Relaxed),
            already_pinned: self.already_pinned.load(Ordering::Relaxed),
            pin_failures: self.pin_failures.load(Ordering::Relaxed),
        }
    }
}
