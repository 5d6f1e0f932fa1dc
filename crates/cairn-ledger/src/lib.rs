//! Transactional ledger backend for Cairn.
//!
//! The registry never touches storage directly. It submits closures to a
//! [`LedgerWriter`], which runs each one against an isolated
//! [`TxContext`] and either commits every buffered write at once or
//! discards all of them. Committed transactions land in an append-only,
//! hash-chained commit log that can be validated and replayed.
//!
//! This crate provides:
//! - `LedgerWriter` / `LedgerReader` trait boundaries
//! - `InMemoryLedger` implementation for tests and embedding
//! - Commit log validation (sequence, hash chain, clock monotonicity)
//! - Deterministic replay of the log into key-value state
//! - Injectable clocks

pub mod clock;
pub mod config;
pub mod context;
pub mod error;
pub mod memory;
pub mod records;
pub mod replay;
pub mod traits;
pub mod validation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::LedgerConfig;
pub use context::TxContext;
pub use error::LedgerError;
pub use memory::InMemoryLedger;
pub use records::{CommitEntry, CommitRef, Committed, LogEntry, StateMap, Write};
pub use replay::{ReplayEngine, ReplayResult};
pub use traits::{Ledger, LedgerReader, LedgerWriter};
pub use validation::{LogValidator, ValidationReport, Violation, ViolationKind};
