//! Foundation types for Cairn.
//!
//! Every other Cairn crate depends on `cairn-types`. The types here carry no
//! behavior beyond construction, comparison, and formatting; invariants over
//! them are enforced by the registry and the pin coordinator.
//!
//! # Key Types
//!
//! - [`ContentId`] — content-addressed reference naming bytes in a content store
//! - [`IntegrityHash`] — lower-case hex digest stored alongside an identifier
//! - [`Owner`] — opaque principal entitled to mutate a record
//! - [`Timestamp`] — ledger clock reading, whole seconds since the UNIX epoch
//! - [`ContentRecord`] — one registered piece of content
//! - [`RecordView`] — the displayed shape of a record (no owner)

pub mod error;
pub mod id;
pub mod record;
pub mod temporal;

pub use error::TypeError;
pub use id::{ContentId, IntegrityHash, Owner};
pub use record::{ContentRecord, RecordView};
pub use temporal::Timestamp;
