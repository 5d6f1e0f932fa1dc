use std::sync::{Arc, RwLock};

use cairn_types::{Owner, Timestamp};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::config::LedgerConfig;
use crate::context::TxContext;
use crate::error::LedgerError;
use crate::records::{CommitEntry, CommitRef, Committed, StateMap};
use crate::traits::{LedgerReader, LedgerWriter};

/// In-memory ledger for tests, local demos, and embedding.
///
/// Transactions are linearized by holding the write lock for the whole
/// closure, which stands in for the consensus ordering of a replicated
/// ledger.
pub struct InMemoryLedger {
    clock: Arc<dyn Clock>,
    inner: RwLock<LedgerState>,
    commits: broadcast::Sender<CommitEntry>,
}

#[derive(Default)]
struct LedgerState {
    state: StateMap,
    log: Vec<CommitEntry>,
}

impl InMemoryLedger {
    pub fn new(config: &LedgerConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &LedgerConfig, clock: Arc<dyn Clock>) -> Self {
        let (commits, _) = broadcast::channel(config.commit_channel_capacity.max(1));
        Self {
            clock,
            inner: RwLock::new(LedgerState::default()),
            commits,
        }
    }

    /// Number of keys in committed state.
    pub fn key_count(&self) -> Result<usize, LedgerError> {
        self.view(|state| state.len())
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new(&LedgerConfig::default())
    }
}

impl LedgerWriter for InMemoryLedger {
    fn transact<T, E, F>(&self, caller: &Owner, f: F) -> Result<Committed<T>, E>
    where
        F: FnOnce(&mut TxContext<'_>) -> Result<T, E>,
        E: From<LedgerError>,
    {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| LedgerError::LockPoisoned("write"))?;
        let ledger = &mut *guard;

        let last = ledger.log.last();
        let timestamp = next_timestamp(last, self.clock.now());
        let seq = ledger.log.len() as u64 + 1;
        let prev_hash = last.map(|entry| entry.entry_hash);

        let mut ctx = TxContext::new(&ledger.state, caller, timestamp);
        let value = f(&mut ctx)?;
        let (writes, logs) = ctx.into_parts();

        let mut entry = CommitEntry {
            seq,
            tx_id: Uuid::now_v7(),
            caller: caller.clone(),
            timestamp,
            writes,
            logs,
            prev_hash,
            entry_hash: [0; 32],
        };
        entry.entry_hash = compute_entry_hash(&entry)?;

        for write in &entry.writes {
            write.apply(&mut ledger.state);
        }
        let commit = CommitRef::from(&entry);
        ledger.log.push(entry.clone());
        // Sent under the write lock so subscribers observe seq order.
        // No receivers is not an error.
        let _ = self.commits.send(entry);
        drop(guard);

        debug!(seq, caller = %caller, "transaction committed");

        Ok(Committed { value, commit })
    }
}

impl LedgerReader for InMemoryLedger {
    fn view<T, F>(&self, f: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&StateMap) -> T,
    {
        let guard = self
            .inner
            .read()
            .map_err(|_| LedgerError::LockPoisoned("read"))?;
        Ok(f(&guard.state))
    }

    fn head(&self) -> Result<Option<CommitRef>, LedgerError> {
        let guard = self
            .inner
            .read()
            .map_err(|_| LedgerError::LockPoisoned("read"))?;
        Ok(guard.log.last().map(CommitRef::from))
    }

    fn read_range(&self, from_seq: u64, to_seq: u64) -> Result<Vec<CommitEntry>, LedgerError> {
        if from_seq == 0 || to_seq == 0 || from_seq > to_seq {
            return Err(LedgerError::InvalidRange {
                from: from_seq,
                to: to_seq,
            });
        }

        let guard = self
            .inner
            .read()
            .map_err(|_| LedgerError::LockPoisoned("read"))?;

        let start = (from_seq - 1) as usize;
        if start >= guard.log.len() {
            return Ok(vec![]);
        }
        let end_exclusive = to_seq.min(guard.log.len() as u64) as usize;
        Ok(guard.log[start..end_exclusive].to_vec())
    }

    fn read_all(&self) -> Result<Vec<CommitEntry>, LedgerError> {
        let guard = self
            .inner
            .read()
            .map_err(|_| LedgerError::LockPoisoned("read"))?;
        Ok(guard.log.clone())
    }

    fn commit_count(&self) -> Result<u64, LedgerError> {
        let guard = self
            .inner
            .read()
            .map_err(|_| LedgerError::LockPoisoned("read"))?;
        Ok(guard.log.len() as u64)
    }

    fn subscribe(&self) -> broadcast::Receiver<CommitEntry> {
        self.commits.subscribe()
    }
}

impl std::fmt::Debug for InMemoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let commits = self.commit_count().unwrap_or_default();
        f.debug_struct("InMemoryLedger")
            .field("commit_count", &commits)
            .finish()
    }
}

/// Hash of a commit entry with its own `entry_hash` zeroed.
pub(crate) fn compute_entry_hash(entry: &CommitEntry) -> Result<[u8; 32], LedgerError> {
    let mut canonical = entry.clone();
    canonical.entry_hash = [0; 32];

    let encoded = serde_json::to_vec(&canonical)
        .map_err(|e| LedgerError::Serialization(e.to_string()))?;

    let mut hasher = blake3::Hasher::new();
    hasher.update(b"cairn-commit-v1:");
    hasher.update(&encoded);
    Ok(*hasher.finalize().as_bytes())
}

/// Ledger time never runs backwards, even if the clock does.
fn next_timestamp(last: Option<&CommitEntry>, now: Timestamp) -> Timestamp {
    match last {
        None => now,
        Some(previous) => now.max(previous.timestamp),
    }
}
