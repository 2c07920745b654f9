//! Server configuration.
//!
//! Values come from the environment (a `.env` file is loaded by the CLI
//! before this runs); command-line flags override them.
//!
//! | Variable               | Default    |
//! |------------------------|------------|
//! | `PORT`                 | `5000`     |
//! | `BIND_ADDR`            | `0.0.0.0`  |
//! | `UPLOAD_FOLDER`        | `uploads`  |
//! | `MAX_CONTENT_LENGTH`   | 16 MiB     |
//! | `REQUEST_TIMEOUT_SECS` | `30`       |
//! | `WORKERS`              | `4`        |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::storage::DEFAULT_UPLOAD_DIR;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 5000;

/// Maximum upload size (in bytes).
///
/// 16 MB limit.
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 16 * 1024 * 1024;

/// Request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Runtime worker threads.
pub const DEFAULT_WORKERS: usize = 4;

/// Everything the HTTP server needs to start.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub max_content_length: usize,
    pub request_timeout: Duration,
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            workers: DEFAULT_WORKERS,
        }
    }
}

impl ServerConfig {
    /// Load from process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key lookup. Unparseable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            bind_addr: parse_var(&lookup, "BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: parse_var(&lookup, "PORT").unwrap_or(defaults.port),
            upload_dir: lookup("UPLOAD_FOLDER")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            max_content_length: parse_var(&lookup, "MAX_CONTENT_LENGTH")
                .unwrap_or(defaults.max_content_length),
            request_timeout: parse_var(&lookup, "REQUEST_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            workers: parse_var::<usize, _>(&lookup, "WORKERS")
                .filter(|w| *w > 0)
                .unwrap_or(defaults.workers),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|raw| raw.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, 5000);
        assert_eq!(config.max_content_length, 16 * 1024 * 1024);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:5000");
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("BIND_ADDR", "127.0.0.1"),
            ("UPLOAD_FOLDER", "/tmp/wers"),
            ("MAX_CONTENT_LENGTH", "1024"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("WORKERS", "2"),
        ]));

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.upload_dir, PathBuf::from("/tmp/wers"));
        assert_eq!(config.max_content_length, 1024);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.workers, 2);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "$PORT"),
            ("WORKERS", "0"),
            ("UPLOAD_FOLDER", "  "),
        ]));

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.workers, DEFAULT_WORKERS);
        assert_eq!(config.upload_dir, PathBuf::from(DEFAULT_UPLOAD_DIR));
    }
}
