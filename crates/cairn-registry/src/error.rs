use std::fmt;

use cairn_ledger::LedgerError;
use cairn_types::{ContentId, Owner};

/// Which uniqueness index a conflicting mutation collided with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictKind {
    Identifier,
    Hash,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier => f.write_str("identifier"),
            Self::Hash => f.write_str("integrity hash"),
        }
    }
}

/// Errors from registry operations.
///
/// Every error aborts the transaction that raised it; no index is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Empty or malformed input on a mutating call.
    #[error("validation error: {0}")]
    Validation(String),

    /// Identifier or hash already belongs to a different active record.
    #[error("{kind} already registered: {value}")]
    Conflict { kind: ConflictKind, value: String },

    /// Caller is not the current owner of the identifier.
    #[error("{caller} is not the owner of {identifier}")]
    Authorization { caller: Owner, identifier: ContentId },

    /// No active record for the identifier.
    #[error("no active record for {0}")]
    NotFound(ContentId),

    /// The ledger backend failed.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl RegistryError {
    pub(crate) fn conflict(kind: ConflictKind, value: impl Into<String>) -> Self {
        Self::Conflict {
            kind,
            value: value.into(),
        }
    }
}

/// Result alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
