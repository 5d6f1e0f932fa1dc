//! Metadata registry for Cairn.
//!
//! The registry is the only component allowed to mutate the three indices
//! that map content identifiers to records:
//!
//! - `record/<identifier>` → [`ContentRecord`](cairn_types::ContentRecord)
//! - `hash/<integrity hash>` → identifier
//! - `owner/<owner>` → ordered identifiers owned by that principal
//!
//! Every mutation runs as one ledger transaction, so the three indices are
//! always updated together or not at all.
//!
//! # Invariants
//!
//! 1. An active identifier has a non-empty owner and appears exactly once in
//!    that owner's sequence.
//! 2. `hash[h] == id` iff `record[id].integrity_hash == h`.
//! 3. Neither identifiers nor hashes are shared by two active records.
//! 4. Removal clears all three indices in one commit.
//! 5. Removal is not a tombstone: a removed identifier or hash can be
//!    registered again, by any owner. Provenance of a re-registered
//!    identifier therefore starts over at its new `Stored` event.

pub mod audit;
pub mod error;
pub mod event;
pub mod keys;
pub mod registry;

pub use audit::{AuditFinding, AuditReport, IndexAudit};
pub use error::{ConflictKind, RegistryError, RegistryResult};
pub use event::RegistryEvent;
pub use registry::{Accepted, MetadataRegistry, NewRecord};
