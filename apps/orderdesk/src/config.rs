//! Application configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. Command line flags override individual values afterwards.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use orderdesk_core::SelectorPolicy;
use orderdesk_db::DbConfig;
use serde::Serialize;

pub const ENV_DATABASE_PATH: &str = "ORDERDESK_DATABASE_PATH";
pub const ENV_MAX_CONNECTIONS: &str = "ORDERDESK_MAX_CONNECTIONS";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "ORDERDESK_CONNECT_TIMEOUT_SECS";
pub const ENV_SELECTOR_POLICY: &str = "ORDERDESK_SELECTOR_POLICY";

/// OrderDesk configuration.
#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection
    pub connect_timeout_secs: u64,

    /// How unlisted region/deadline codes are treated
    pub selector_policy: SelectorPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: PathBuf::from("./orderdesk.db"),
            max_connections: 5,
            connect_timeout_secs: 30,
            selector_policy: SelectorPolicy::Permissive,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();

        let config = AppConfig {
            database_path: lookup(ENV_DATABASE_PATH)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),

            max_connections: match lookup(ENV_MAX_CONNECTIONS) {
                Some(v) => v
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue(ENV_MAX_CONNECTIONS.to_string()))?,
                None => defaults.max_connections,
            },

            connect_timeout_secs: match lookup(ENV_CONNECT_TIMEOUT_SECS) {
                Some(v) => v
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue(ENV_CONNECT_TIMEOUT_SECS.to_string()))?,
                None => defaults.connect_timeout_secs,
            },

            selector_policy: match lookup(ENV_SELECTOR_POLICY) {
                Some(v) => SelectorPolicy::parse(&v)
                    .ok_or_else(|| ConfigError::InvalidValue(ENV_SELECTOR_POLICY.to_string()))?,
                None => defaults.selector_policy,
            },
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue(ENV_MAX_CONNECTIONS.to_string()));
        }

        Ok(config)
    }

    /// Pool configuration for this application config.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path.clone())
            .max_connections(self.max_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.database_path, PathBuf::from("./orderdesk.db"));
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.connect_timeout_secs, 30);
        assert_eq!(config.selector_policy, SelectorPolicy::Permissive);
    }

    #[test]
    fn test_values_from_environment() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_DATABASE_PATH, "/var/lib/orderdesk/od.db"),
            (ENV_MAX_CONNECTIONS, "8"),
            (ENV_CONNECT_TIMEOUT_SECS, "3"),
            (ENV_SELECTOR_POLICY, "strict"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/var/lib/orderdesk/od.db"));
        assert_eq!(config.max_connections, 8);
        assert_eq!(config.selector_policy, SelectorPolicy::Strict);

        let db = config.db_config();
        assert_eq!(db.max_connections, 8);
        assert_eq!(db.connect_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_values_rejected() {
        for (key, value) in [
            (ENV_MAX_CONNECTIONS, "many"),
            (ENV_MAX_CONNECTIONS, "0"),
            (ENV_CONNECT_TIMEOUT_SECS, "-1"),
            (ENV_SELECTOR_POLICY, "lenient"),
        ] {
            let err = AppConfig::from_lookup(lookup(&[(key, value)])).unwrap_err();
            assert!(err.to_string().contains(key), "{key}={value}");
        }
    }
}
