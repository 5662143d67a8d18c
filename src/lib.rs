//! ttl_kv - An in-memory key-value store
//!
//! Entries carry a countdown TTL drained by a background sweeper; the whole
//! store can be dumped to and restored from a line-oriented snapshot file.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::{Result, StoreError};
pub use store::{Entry, KeyValueStore, SnapshotCodec};
pub use tasks::spawn_sweeper_task;
