//! Integrity hashing for Cairn.
//!
//! The integrity hash of a record is the SHA-256 digest, lower-case hex, of
//! the UTF-8 bytes of the **identifier string** — not of the content bytes
//! the identifier addresses. A matching hash therefore proves "this
//! identifier was registered with this hash", not "these bytes are
//! untampered". Content-level integrity comes from the content store's own
//! addressing. Clients computing hashes off-process must use the same rule.
//!
//! All crypto operations wrap established libraries — no custom cryptography.

pub mod hasher;

pub use hasher::IntegrityHasher;
