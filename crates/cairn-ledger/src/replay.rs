use crate::error::LedgerError;
use crate::records::{CommitEntry, StateMap};
use crate::traits::LedgerReader;

/// Result of replaying a commit log into key-value state.
#[derive(Clone, Debug, PartialEq)]
pub struct ReplayResult {
    pub applied_entries: u64,
    pub applied_writes: u64,
    pub state: StateMap,
}

/// Deterministic replay helpers for commit logs.
pub struct ReplayEngine;

impl ReplayEngine {
    pub fn replay_from_genesis<R: LedgerReader>(reader: &R) -> Result<ReplayResult, LedgerError> {
        let entries = reader.read_all()?;
        Ok(Self::replay_entries(&entries))
    }

    pub fn replay_entries(entries: &[CommitEntry]) -> ReplayResult {
        let mut state = StateMap::new();
        let mut applied_writes = 0u64;

        for entry in entries {
            for write in &entry.writes {
                write.apply(&mut state);
                applied_writes += 1;
            }
        }

        ReplayResult {
            applied_entries: entries.len() as u64,
            applied_writes,
            state,
        }
    }

    /// Returns `true` if replaying the log reproduces the live state.
    pub fn verify_convergence<R: LedgerReader>(reader: &R) -> Result<bool, LedgerError> {
        let replayed = Self::replay_from_genesis(reader)?;
        reader.view(|live| *live == replayed.state)
    }
}
