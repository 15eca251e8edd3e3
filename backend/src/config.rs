//! Runtime configuration.
//!
//! Defaults can be overridden from the environment (the binary loads a
//! `.env` file first, if present) and then by command-line flags.
//!
//! | Variable               | Default   |
//! |------------------------|-----------|
//! | `CATALOG_CLEANER_HOST` | `0.0.0.0` |
//! | `CATALOG_CLEANER_PORT` | `3000`    |

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default watch poll interval, in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 20;

/// Name of the archive directory created under the input directory.
pub const DEFAULT_ARCHIVE_DIR: &str = "processed";

const HOST_VAR: &str = "CATALOG_CLEANER_HOST";
const PORT_VAR: &str = "CATALOG_CLEANER_PORT";

// =============================================================================
// Server
// =============================================================================

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// Load from the environment, falling back to defaults.
    ///
    /// Expects `.env` to be loaded already. Unparsable values are logged and
    /// ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(HOST_VAR) {
            match raw.parse() {
                Ok(host) => config.host = host,
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid {}", HOST_VAR),
            }
        }
        if let Some(raw) = lookup(PORT_VAR) {
            match raw.parse() {
                Ok(port) => config.port = port,
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid {}", PORT_VAR),
            }
        }

        config
    }

    /// Override the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Watcher
// =============================================================================

/// Directory watcher settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Where processed inputs are moved.
    pub archive_dir: PathBuf,
    pub interval: Duration,
    /// Column to detect duplicates on.
    pub id_column: String,
}

impl WatchConfig {
    pub fn new(input_dir: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Self {
        let input_dir = input_dir.as_ref().to_path_buf();
        Self {
            archive_dir: input_dir.join(DEFAULT_ARCHIVE_DIR),
            input_dir,
            output_dir: output_dir.as_ref().to_path_buf(),
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            id_column: crate::transform::DEFAULT_ID_COLUMN.to_string(),
        }
    }

    pub fn with_archive_dir(mut self, archive_dir: impl AsRef<Path>) -> Self {
        self.archive_dir = archive_dir.as_ref().to_path_buf();
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_id_column(mut self, id_column: impl Into<String>) -> Self {
        self.id_column = id_column.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_server_defaults() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config.addr().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_server_env_overrides() {
        let vars = HashMap::from([(HOST_VAR, "127.0.0.1"), (PORT_VAR, "8081")]);
        let config = ServerConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.addr().to_string(), "127.0.0.1:8081");
    }

    #[test]
    fn test_from_env_reads_process_environment() {
        env::set_var(PORT_VAR, "8123");
        let config = ServerConfig::from_env();
        env::remove_var(PORT_VAR);

        assert_eq!(config.port, 8123);
    }

    #[test]
    fn test_invalid_port_ignored() {
        let config = ServerConfig::from_lookup(|k| (k == PORT_VAR).then(|| "http".to_string()));
        assert_eq!(config.port, 3000);
        assert_eq!(config.with_port(9000).port, 9000);
    }

    #[test]
    fn test_watch_defaults() {
        let config = WatchConfig::new("inbox", "outbox");
        assert_eq!(config.archive_dir, PathBuf::from("inbox/processed"));
        assert_eq!(config.interval, Duration::from_secs(20));
        assert_eq!(config.id_column, "id");
    }
}
