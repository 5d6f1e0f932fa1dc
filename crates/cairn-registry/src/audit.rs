//! Cross-index consistency audit.
//!
//! An [`AuditReport`] lists every place where the record, hash, and owner
//! indices disagree. A registry that only ever mutates through
//! [`MetadataRegistry`](crate::MetadataRegistry) produces an empty report;
//! findings indicate a ledger written by something else.

use std::collections::HashMap;

use cairn_ledger::{LedgerError, LedgerReader, StateMap};
use cairn_types::{ContentId, ContentRecord, IntegrityHash, Owner};
use serde::{Deserialize, Serialize};

use crate::keys::{HASH_PREFIX, OWNER_PREFIX, RECORD_PREFIX};

/// One inconsistency between the registry indices.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditFinding {
    /// A key in the registry keyspace whose value cannot be decoded.
    Undecodable { key: String },
    /// Record stored under a key that names a different identifier.
    MisfiledRecord { key: String, identifier: ContentId },
    OwnerlessRecord { identifier: ContentId },
    /// Record whose hash does not point back at it.
    DanglingRecordHash {
        identifier: ContentId,
        integrity_hash: IntegrityHash,
    },
    /// Hash entry pointing at a missing record or one with another hash.
    OrphanHash {
        integrity_hash: IntegrityHash,
        identifier: ContentId,
    },
    /// Record missing from its owner's sequence, or listed more than once.
    OwnerListMismatch {
        owner: Owner,
        identifier: ContentId,
        occurrences: usize,
    },
    /// Owner sequence entry whose record is gone or owned by someone else.
    StrayOwnerEntry { owner: Owner, identifier: ContentId },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    pub records: usize,
    pub hashes: usize,
    pub owners: usize,
    pub findings: Vec<AuditFinding>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Registry index auditor.
pub struct IndexAudit;

impl IndexAudit {
    pub fn run<R: LedgerReader>(reader: &R) -> Result<AuditReport, LedgerError> {
        reader.view(audit_state)
    }
}

fn with_prefix<'a>(
    state: &'a StateMap,
    prefix: &'a str,
) -> impl Iterator<Item = (&'a str, &'a serde_json::Value)> + 'a {
    state
        .range(prefix.to_string()..)
        .take_while(move |(key, _)| key.starts_with(prefix))
        .map(move |(key, value)| (&key[prefix.len()..], value))
}

fn audit_state(state: &StateMap) -> AuditReport {
    let mut report = AuditReport::default();
    let mut records: HashMap<ContentId, ContentRecord> = HashMap::new();
    let mut hashes: HashMap<IntegrityHash, ContentId> = HashMap::new();
    let mut owners: HashMap<Owner, Vec<ContentId>> = HashMap::new();

    for (suffix, value) in with_prefix(state, RECORD_PREFIX) {
        match serde_json::from_value::<ContentRecord>(value.clone()) {
            Ok(record) => {
                if record.identifier.as_str() != suffix {
                    report.findings.push(AuditFinding::MisfiledRecord {
                        key: format!("{RECORD_PREFIX}{suffix}"),
                        identifier: record.identifier.clone(),
                    });
                }
                records.insert(record.identifier.clone(), record);
            }
            Err(_) => report.findings.push(AuditFinding::Undecodable {
                key: format!("{RECORD_PREFIX}{suffix}"),
            }),
        }
    }
    for (suffix, value) in with_prefix(state, HASH_PREFIX) {
        match serde_json::from_value::<ContentId>(value.clone()) {
            Ok(id) => {
                hashes.insert(IntegrityHash::from(suffix), id);
            }
            Err(_) => report.findings.push(AuditFinding::Undecodable {
                key: format!("{HASH_PREFIX}{suffix}"),
            }),
        }
    }
    for (suffix, value) in with_prefix(state, OWNER_PREFIX) {
        match serde_json::from_value::<Vec<ContentId>>(value.clone()) {
            Ok(ids) => {
                owners.insert(Owner::from(suffix), ids);
            }
            Err(_) => report.findings.push(AuditFinding::Undecodable {
                key: format!("{OWNER_PREFIX}{suffix}"),
            }),
        }
    }

    for record in records.values() {
        if record.owner.is_empty() {
            report.findings.push(AuditFinding::OwnerlessRecord {
                identifier: record.identifier.clone(),
            });
        }
        if hashes.get(&record.integrity_hash) != Some(&record.identifier) {
            report.findings.push(AuditFinding::DanglingRecordHash {
                identifier: record.identifier.clone(),
                integrity_hash: record.integrity_hash.clone(),
            });
        }
        let occurrences = owners
            .get(&record.owner)
            .map(|ids| ids.iter().filter(|id| **id == record.identifier).count())
            .unwrap_or(0);
        if occurrences != 1 {
            report.findings.push(AuditFinding::OwnerListMismatch {
                owner: record.owner.clone(),
                identifier: record.identifier.clone(),
                occurrences,
            });
        }
    }

    for (hash, id) in &hashes {
        let consistent = records
            .get(id)
            .is_some_and(|record| record.integrity_hash == *hash);
        if !consistent {
            report.findings.push(AuditFinding::OrphanHash {
                integrity_hash: hash.clone(),
                identifier: id.clone(),
            });
        }
    }

    for (owner, ids) in &owners {
        for id in ids {
            let owned = records.get(id).is_some_and(|record| record.owner == *owner);
            if !owned {
                report.findings.push(AuditFinding::StrayOwnerEntry {
                    owner: owner.clone(),
                    identifier: id.clone(),
                });
            }
        }
    }

    report.records = records.len();
    report.hashes = hashes.len();
    report.owners = owners.len();
    report
}
