//! Key-Value Store Module
//!
//! Main storage engine: a HashMap of countdown-TTL entries behind a single
//! RwLock, with expiry notifications published to subscribers.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::store::stats::StatsCounters;
use crate::store::{Entry, StoreStats};

/// Buffered expiry notifications per subscriber before lagging.
const EXPIRATION_CHANNEL_CAPACITY: usize = 1024;

// == Expired Entry ==
/// Notification emitted when the sweeper evicts an entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpiredEntry {
    pub key: String,
    /// Last value held, `None` if the key had been cleared
    pub value: Option<String>,
    pub expired_at: DateTime<Utc>,
}

// == Key-Value Store ==
/// Thread-safe key-value store with countdown TTLs.
///
/// Every operation takes the map lock for its whole duration, so callers
/// never see a half-applied write, a torn entry, or an expired entry.
/// Reads return owned copies.
#[derive(Debug)]
pub struct KeyValueStore {
    /// Key-value storage
    entries: RwLock<HashMap<String, Entry>>,
    /// Operation counters
    stats: StatsCounters,
    /// Expiry notification fan-out
    expirations: broadcast::Sender<ExpiredEntry>,
    /// TTL for writes without an explicit TTL
    default_ttl: i64,
}

impl KeyValueStore {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `default_ttl` - TTL used by `set` without a TTL and restored by `remove`
    pub fn new(default_ttl: i64) -> Self {
        let (expirations, _) = broadcast::channel(EXPIRATION_CHANNEL_CAPACITY);
        Self {
            entries: RwLock::new(HashMap::new()),
            stats: StatsCounters::default(),
            expirations,
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> i64 {
        self.default_ttl
    }

    fn read_entries(&self) -> RwLockReadGuard<'_, HashMap<String, Entry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, HashMap<String, Entry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    // == Get ==
    /// Retrieves the value stored under `key`.
    ///
    /// Returns `None` for absent keys and for keys cleared by `remove`.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = self
            .read_entries()
            .get(key)
            .and_then(|entry| entry.value().map(str::to_owned));

        match value {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        value
    }

    // == Set ==
    /// Stores a value under `key`.
    ///
    /// An existing key keeps its slot: the value is replaced and the TTL is
    /// set to `ttl`, or to the default TTL when `ttl` is `None`. Rejected
    /// writes leave the store untouched.
    ///
    /// # Arguments
    /// * `key` - Non-empty, not all whitespace
    /// * `value` - Non-empty, not all whitespace
    /// * `ttl` - Optional TTL, strictly positive when given
    pub fn set(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
        ttl: Option<i64>,
    ) -> Result<()> {
        let key = key.into();
        let value = value.into();

        if let Err(err) = validate(&key, &value, ttl) {
            self.stats.record_rejected_write();
            debug!(key = %key, "Rejected write: {}", err);
            return Err(err);
        }

        let ttl = ttl.unwrap_or(self.default_ttl);
        let mut entries = self.write_entries();
        match entries.get_mut(&key) {
            Some(entry) => {
                entry.set_value(value);
                entry.set_ttl(ttl);
            }
            None => {
                let entry = Entry::new(key.clone(), value, ttl);
                entries.insert(key, entry);
            }
        }

        Ok(())
    }

    // == Remove ==
    /// Clears the value stored under `key` and returns it.
    ///
    /// The slot stays in the map with a cleared value and a fresh default
    /// TTL, so it expires on its own later or is reused by the next `set`.
    /// The TTL is reset even when the value was already cleared.
    pub fn remove(&self, key: &str) -> Option<String> {
        let mut entries = self.write_entries();
        let entry = entries.get_mut(key)?;
        entry.set_ttl(self.default_ttl);
        entry.take_value()
    }

    // == List ==
    /// Returns copies of every entry, cleared ones included, ordered by key.
    ///
    /// An empty store yields an empty Vec.
    pub fn list(&self) -> Vec<Entry> {
        let mut entries: Vec<Entry> = self.read_entries().values().cloned().collect();
        entries.sort_by(|a, b| a.key().cmp(b.key()));
        entries
    }

    // == Sweep ==
    /// Runs one expiration pass, subtracting `n` from every TTL.
    ///
    /// Entries whose TTL drops to zero or below are evicted inside the same
    /// critical section, then announced to subscribers. Returns the evicted
    /// entries.
    pub fn sweep(&self, n: i64) -> Vec<ExpiredEntry> {
        if n <= 0 {
            return Vec::new();
        }

        let expired_at = Utc::now();
        let mut expired = Vec::new();
        self.write_entries().retain(|key, entry| {
            if entry.tick(n) {
                expired.push(ExpiredEntry {
                    key: key.clone(),
                    value: entry.take_value(),
                    expired_at,
                });
                false
            } else {
                true
            }
        });

        if !expired.is_empty() {
            self.stats.record_expirations(expired.len() as u64);
            for event in &expired {
                info!(
                    "Lifetime of {}:{} is expired",
                    event.key,
                    event.value.as_deref().unwrap_or("null")
                );
                // No subscribers is not an error
                let _ = self.expirations.send(event.clone());
            }
        }

        expired
    }

    // == Subscribe ==
    /// Returns a receiver for expiry notifications emitted after this call.
    pub fn subscribe_expirations(&self) -> broadcast::Receiver<ExpiredEntry> {
        self.expirations.subscribe()
    }

    // == Exclusive Access ==
    /// Runs `f` with exclusive access to the whole map.
    ///
    /// Used by snapshot restore so no reader observes a half-loaded store.
    pub(crate) fn with_entries_mut<T>(
        &self,
        f: impl FnOnce(&mut HashMap<String, Entry>) -> T,
    ) -> T {
        let mut entries = self.write_entries();
        f(&mut entries)
    }

    // == Stats ==
    /// Returns current store statistics.
    pub fn stats(&self) -> StoreStats {
        self.stats.snapshot(self.len())
    }

    // == Length ==
    /// Returns the number of slots in the store, cleared ones included.
    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_entries().is_empty()
    }
}

impl Default for KeyValueStore {
    fn default() -> Self {
        Self::new(crate::store::DEFAULT_TTL)
    }
}

// == Validation ==
fn validate(key: &str, value: &str, ttl: Option<i64>) -> Result<()> {
    if key.trim().is_empty() {
        return Err(StoreError::InvalidInput(
            "Key cannot be empty or blank".to_string(),
        ));
    }
    if value.trim().is_empty() {
        return Err(StoreError::InvalidInput(
            "Value cannot be empty or blank".to_string(),
        ));
    }
    if let Some(ttl) = ttl {
        if ttl <= 0 {
            return Err(StoreError::InvalidInput(format!(
                "TTL must be positive, got {}",
                ttl
            )));
        }
    }
    Ok(())
}
