use cairn_types::ContentId;
use thiserror::Error;

/// Errors from pin coordination.
///
/// `PinFailure` is absorbed at the coordinator boundary by every public
/// operation except [`try_ensure_pinned`](crate::PinCoordinator::try_ensure_pinned).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PinError {
    /// The store could not take an upload or serve a read.
    #[error("content store unavailable: {0}")]
    StoreUnavailable(String),

    /// A pin request or pin status check failed.
    #[error("pin failed for {identifier}: {reason}")]
    PinFailure {
        identifier: ContentId,
        reason: String,
    },
}

impl PinError {
    pub(crate) fn pin_failure(identifier: &ContentId, reason: impl Into<String>) -> Self {
        Self::PinFailure {
            identifier: identifier.clone(),
            reason: reason.into(),
        }
    }
}

pub type PinResult<T> = Result<T, PinError>;
