//! Content store capability interface for Cairn.
//!
//! Cairn does not own a content store; it consumes one through the
//! [`ContentStore`] trait. Any content-addressed store that can add bytes,
//! pin identifiers, report pin status, and return bytes is substitutable.
//!
//! # Storage Backends
//!
//! - [`InMemoryContentStore`] -- `HashMap`-based store with fault injection
//!   for tests and embedding
//!
//! # Design Rules
//!
//! 1. Identifiers are derived from content; adding the same bytes twice is a no-op.
//! 2. Pinning an already-pinned identifier is a no-op.
//! 3. Unpinned content may be garbage-collected at any time.
//! 4. All backend failures surface as [`StoreError`], never as panics.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryContentStore;
pub use traits::{AddResult, ContentStore};
