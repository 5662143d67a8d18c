//! Store Entry Module
//!
//! Defines a single key/value record with a countdown TTL.

use serde::{Deserialize, Serialize};

/// TTL given to entries written without an explicit TTL, and restored by remove.
pub const DEFAULT_TTL: i64 = 600_000;

// == Entry ==
/// A key/value pair with its remaining time to live.
///
/// The TTL is a counter, not a deadline: the sweeper subtracts its step on
/// every tick and the entry is evicted once the counter reaches zero.
/// A `None` value marks a key cleared by `remove`.
///
/// Field names on the wire are `Key`, `Value` and `TTl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "Key")]
    key: String,
    #[serde(rename = "Value")]
    value: Option<String>,
    #[serde(rename = "TTl")]
    ttl: i64,
}

impl Entry {
    // == Constructor ==
    /// Creates an entry holding `value` with the given remaining TTL.
    pub fn new(key: impl Into<String>, value: impl Into<String>, ttl: i64) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
            ttl,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current value, `None` once cleared.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Remaining TTL.
    pub fn ttl(&self) -> i64 {
        self.ttl
    }

    pub fn is_cleared(&self) -> bool {
        self.value.is_none()
    }

    // == Mutators ==
    pub(crate) fn set_value(&mut self, value: String) {
        self.value = Some(value);
    }

    pub(crate) fn set_ttl(&mut self, ttl: i64) {
        self.ttl = ttl;
    }

    /// Clears the value and returns what was stored.
    pub(crate) fn take_value(&mut self) -> Option<String> {
        self.value.take()
    }

    // == Tick ==
    /// Subtracts `n` from the TTL. Returns true once the entry has expired.
    pub(crate) fn tick(&mut self, n: i64) -> bool {
        self.ttl = self.ttl.saturating_sub(n);
        self.ttl <= 0
    }
}
