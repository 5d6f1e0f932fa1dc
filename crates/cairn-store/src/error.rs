use cairn_types::ContentId;

/// Errors from content store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or did not answer in time.
    #[error("content store unavailable: {0}")]
    Unavailable(String),

    /// The store has no bytes for the identifier.
    #[error("content not found: {0}")]
    NotFound(ContentId),

    /// The store answered but refused to pin.
    #[error("pin rejected for {identifier}: {reason}")]
    PinRejected {
        identifier: ContentId,
        reason: String,
    },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
