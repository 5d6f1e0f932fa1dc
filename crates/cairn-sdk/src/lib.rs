//! High-level SDK for Cairn.
//!
//! [`Cairn`] wires the metadata registry, the pin coordinator, and a content
//! store together behind one explicitly constructed handle. Producers call
//! [`Cairn::publish`]; consumers call [`Cairn::fetch`] or [`Cairn::view`],
//! which run the post-fetch pin hook on every read. [`Cairn::dispose`]
//! consumes the handle and returns the final pin counters.

pub mod client;
pub mod config;
pub mod error;
pub mod publish;

pub use client::Cairn;
pub use config::CairnConfig;
pub use error::{SdkError, SdkResult};
pub use publish::{FetchedContent, PublishReceipt, PublishRequest};

// Re-export key types
pub use cairn_crypto::IntegrityHasher;
pub use cairn_ledger::{InMemoryLedger, LedgerConfig};
pub use cairn_pin::{NoOpHook, PinConfig, PinStatsSnapshot, PostFetchHook};
pub use cairn_registry::{MetadataRegistry, NewRecord, RegistryError, RegistryEvent};
pub use cairn_store::{ContentStore, InMemoryContentStore};
pub use cairn_types::{ContentId, ContentRecord, IntegrityHash, Owner, RecordView};
