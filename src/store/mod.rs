//! Store Module
//!
//! Provides the in-memory key-value store with countdown TTL expiration
//! and full-state snapshot persistence.

mod entry;
pub mod snapshot;
mod stats;
#[allow(clippy::module_inception)]
mod store;


// Re-export public types
pub use entry::{Entry, DEFAULT_TTL};
pub use snapshot::SnapshotCodec;
pub use stats::StoreStats;
pub use store::{ExpiredEntry, KeyValueStore};
