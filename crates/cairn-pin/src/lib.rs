//! Pin coordinator for Cairn.
//!
//! Keeps content referenced by registry records retrievable from an external
//! content store. Pinning happens at three points:
//!
//! - at upload, via the store's pin-on-add flag plus one explicit pin request
//! - on demand, through [`PinCoordinator::ensure_pinned`] and
//!   [`PinCoordinator::manual_pin`]
//! - on every read, through the [`PostFetchHook`] the read path invokes after
//!   fetching a record, which pins the record and the media it references
//!
//! Pin failures never fail the caller's primary operation. They are logged,
//! counted in [`PinStats`], and reported as `false`. Only a failed upload
//! surfaces as an error ([`PinError::StoreUnavailable`]).

pub mod config;
pub mod coordinator;
pub mod error;
pub mod hook;
pub mod reference;
pub mod stats;

pub use config::PinConfig;
pub use coordinator::{PinCoordinator, PinOutcome, PinReport, UploadReceipt};
pub use error::{PinError, PinResult};
pub use hook::{NoOpHook, PostFetchHook};
pub use reference::extract_reference;
pub use stats::{PinStats, PinStatsSnapshot};
