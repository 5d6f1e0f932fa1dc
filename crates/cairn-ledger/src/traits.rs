use cairn_types::Owner;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::context::TxContext;
use crate::error::LedgerError;
use crate::records::{CommitEntry, CommitRef, Committed, StateMap};

/// Write boundary: linearized, all-or-nothing transactions.
pub trait LedgerWriter: Send + Sync {
    /// Run `f` as one transaction attributed to `caller`.
    ///
    /// Implementations must linearize transactions: `f` observes every
    /// transaction committed before it and none committed after. If `f`
    /// returns `Err`, no write and no log entry from it may become visible.
    fn transact<T, E, F>(&self, caller: &Owner, f: F) -> Result<Committed<T>, E>
    where
        F: FnOnce(&mut TxContext<'_>) -> Result<T, E>,
        E: From<LedgerError>;
}

/// Read boundary: state queries and commit log access.
pub trait LedgerReader: Send + Sync {
    /// Run `f` against a consistent snapshot of committed state.
    fn view<T, F>(&self, f: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&StateMap) -> T;

    fn get(&self, key: &str) -> Result<Option<Value>, LedgerError> {
        self.view(|state| state.get(key).cloned())
    }

    fn head(&self) -> Result<Option<CommitRef>, LedgerError>;

    /// Inclusive range of commits by sequence number (1-based).
    fn read_range(&self, from_seq: u64, to_seq: u64) -> Result<Vec<CommitEntry>, LedgerError>;

    fn read_all(&self) -> Result<Vec<CommitEntry>, LedgerError>;

    fn commit_count(&self) -> Result<u64, LedgerError>;

    /// Receive every commit appended after this call.
    fn subscribe(&self) -> broadcast::Receiver<CommitEntry>;
}

/// A full ledger backend.
pub trait Ledger: LedgerReader + LedgerWriter {}

impl<T: LedgerReader + LedgerWriter> Ledger for T {}
