use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_PARTICIPATION_ROW_LIMIT: i64 = 5000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Process-level settings read once at startup and handed to `AppState`.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// When absent the service runs on empty in-memory repositories.
    pub database_url: Option<String>,
    pub bind_addr: SocketAddr,
    /// Upper bound on participation rows read by the computed leaderboard.
    pub participation_row_limit: i64,
    pub database_max_connections: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            bind_addr: DEFAULT_BIND_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 3000))),
            participation_row_limit: DEFAULT_PARTICIPATION_ROW_LIMIT,
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let bind_addr = match lookup("BIND_ADDR") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "BIND_ADDR",
                value: raw,
            })?,
            None => defaults.bind_addr,
        };

        let participation_row_limit = match lookup("PARTICIPATION_ROW_LIMIT") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(limit) if limit > 0 => limit,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "PARTICIPATION_ROW_LIMIT",
                        value: raw,
                    })
                }
            },
            None => defaults.participation_row_limit,
        };

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(count) if count > 0 => count,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "DATABASE_MAX_CONNECTIONS",
                        value: raw,
                    })
                }
            },
            None => defaults.database_max_connections,
        };

        Ok(Self {
            database_url,
            bind_addr,
            participation_row_limit,
            database_max_connections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_env_is_empty() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.database_url.is_none());
        assert_eq!(config.participation_row_limit, 5000);
        assert_eq!(config.bind_addr.port(), 3000);
    }

    #[test]
    fn test_reads_all_values() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://arena@localhost/arena"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("PARTICIPATION_ROW_LIMIT", "250"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
        ]))
        .unwrap();

        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://arena@localhost/arena")
        );
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.participation_row_limit, 250);
        assert_eq!(config.database_max_connections, 12);
    }

    #[test]
    fn test_blank_database_url_is_ignored() {
        let config = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "  ")])).unwrap();
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_rejects_non_positive_row_limit() {
        let result = AppConfig::from_lookup(lookup_from(&[("PARTICIPATION_ROW_LIMIT", "0")]));
        assert_eq!(
            result.unwrap_err(),
            ConfigError::InvalidValue {
                key: "PARTICIPATION_ROW_LIMIT",
                value: "0".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_malformed_bind_addr() {
        let result = AppConfig::from_lookup(lookup_from(&[("BIND_ADDR", "not-an-addr")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                key: "BIND_ADDR",
                ..
            })
        ));
    }
}
