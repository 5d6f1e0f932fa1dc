use std::collections::BTreeMap;

use cairn_types::{Owner, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Key-value state held by a ledger.
pub type StateMap = BTreeMap<String, Value>;

/// A single state mutation recorded in a commit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Write {
    Put { key: String, value: Value },
    Delete { key: String },
}

impl Write {
    /// Apply this write to a state map.
    pub fn apply(&self, state: &mut StateMap) {
        match self {
            Self::Put { key, value } => {
                state.insert(key.clone(), value.clone());
            }
            Self::Delete { key } => {
                state.remove(key);
            }
        }
    }
}

/// A log record emitted by a committed transaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub topic: String,
    pub payload: Value,
}

/// One committed transaction in the ledger's append-only log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommitEntry {
    /// 1-based position in the log.
    pub seq: u64,
    pub tx_id: Uuid,
    pub caller: Owner,
    pub timestamp: Timestamp,
    pub writes: Vec<Write>,
    pub logs: Vec<LogEntry>,
    pub prev_hash: Option<[u8; 32]>,
    pub entry_hash: [u8; 32],
}

/// Compact reference to a committed transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRef {
    pub seq: u64,
    pub tx_id: Uuid,
    pub timestamp: Timestamp,
    pub entry_hash: [u8; 32],
}

impl From<&CommitEntry> for CommitRef {
    fn from(entry: &CommitEntry) -> Self {
        Self {
            seq: entry.seq,
            tx_id: entry.tx_id,
            timestamp: entry.timestamp,
            entry_hash: entry.entry_hash,
        }
    }
}

/// Value returned by a committed transaction together with its commit.
#[derive(Clone, Debug, PartialEq)]
pub struct Committed<T> {
    pub value: T,
    pub commit: CommitRef,
}
