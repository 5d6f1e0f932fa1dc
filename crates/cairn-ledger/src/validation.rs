use crate::error::LedgerError;
use crate::memory::compute_entry_hash;
use crate::records::CommitEntry;
use crate::traits::LedgerReader;

/// Result of commit log validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    pub entry_count: u64,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A specific integrity violation detected during validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub seq: u64,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    SequenceGap,
    HashChainBreak,
    HashMismatch,
    ClockRegression,
}

/// Commit log integrity validator.
pub struct LogValidator;

impl LogValidator {
    /// Validate the full commit log of a ledger.
    pub fn validate<R: LedgerReader>(reader: &R) -> Result<ValidationReport, LedgerError> {
        let entries = reader.read_all()?;
        Self::validate_entries(&entries)
    }

    /// Validate an already-fetched sequence of commit entries.
    pub fn validate_entries(entries: &[CommitEntry]) -> Result<ValidationReport, LedgerError> {
        let mut violations = Vec::new();

        for (index, entry) in entries.iter().enumerate() {
            let expected_seq = (index + 1) as u64;
            if entry.seq != expected_seq {
                violations.push(Violation {
                    seq: entry.seq,
                    kind: ViolationKind::SequenceGap,
                    description: format!("expected seq {expected_seq}, got {}", entry.seq),
                });
            }

            let previous = index.checked_sub(1).map(|i| &entries[i]);
            let expected_prev = previous.map(|p| p.entry_hash);
            if entry.prev_hash != expected_prev {
                violations.push(Violation {
                    seq: entry.seq,
                    kind: ViolationKind::HashChainBreak,
                    description: "previous hash link mismatch".into(),
                });
            }

            if compute_entry_hash(entry)? != entry.entry_hash {
                violations.push(Violation {
                    seq: entry.seq,
                    kind: ViolationKind::HashMismatch,
                    description: "entry hash does not match contents".into(),
                });
            }

            if let Some(prev) = previous {
                if entry.timestamp < prev.timestamp {
                    violations.push(Violation {
                        seq: entry.seq,
                        kind: ViolationKind::ClockRegression,
                        description: format!(
                            "timestamp {} precedes previous {}",
                            entry.timestamp, prev.timestamp
                        ),
                    });
                }
            }
        }

        Ok(ValidationReport {
            entry_count: entries.len() as u64,
            violations,
        })
    }
}
