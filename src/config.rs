//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::store::snapshot::DEFAULT_SNAPSHOT_PATH;
use crate::store::DEFAULT_TTL;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// TTL assigned to entries written without an explicit TTL
    pub default_ttl: i64,
    /// HTTP server port
    pub server_port: u16,
    /// Sweeper tick interval in milliseconds, also the TTL step per tick
    pub sweep_interval_ms: u64,
    /// Location of the snapshot file written by dump and read by load
    pub snapshot_path: PathBuf,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_TTL` - Default TTL in milliseconds (default: 600000)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `SWEEP_INTERVAL_MS` - Sweeper tick interval (default: 1)
    /// - `SNAPSHOT_PATH` - Snapshot file location (default: dump.txt)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_ttl: env::var("DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|ttl: &i64| *ttl > 0)
                .unwrap_or(defaults.default_ttl),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            sweep_interval_ms: env::var("SWEEP_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|ms: &u64| *ms > 0)
                .unwrap_or(defaults.sweep_interval_ms),
            snapshot_path: env::var("SNAPSHOT_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.snapshot_path),
        }
    }

    /// Sweeper tick interval as a Duration.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_TTL,
            server_port: 8080,
            sweep_interval_ms: 1,
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.default_ttl, 600_000);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.sweep_interval_ms, 1);
        assert_eq!(config.snapshot_path, PathBuf::from("dump.txt"));
        assert_eq!(config.sweep_interval(), Duration::from_millis(1));
    }

    // Single test touches the environment so parallel tests do not race on it.
    #[test]
    fn test_config_from_env() {
        env::remove_var("DEFAULT_TTL");
        env::remove_var("SERVER_PORT");
        env::remove_var("SWEEP_INTERVAL_MS");
        env::remove_var("SNAPSHOT_PATH");

        let config = Config::from_env();
        assert_eq!(config.default_ttl, 600_000);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.sweep_interval_ms, 1);
        assert_eq!(config.snapshot_path, PathBuf::from("dump.txt"));

        env::set_var("DEFAULT_TTL", "-5");
        env::set_var("SWEEP_INTERVAL_MS", "10");
        env::set_var("SNAPSHOT_PATH", "/tmp/state.txt");
        let config = Config::from_env();
        assert_eq!(config.default_ttl, 600_000);
        assert_eq!(config.sweep_interval_ms, 10);
        assert_eq!(config.snapshot_path, PathBuf::from("/tmp/state.txt"));

        env::remove_var("DEFAULT_TTL");
        env::remove_var("SWEEP_INTERVAL_MS");
        env::remove_var("SNAPSHOT_PATH");
    }
}
