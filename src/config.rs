//! Runtime, credential, and storage configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Environment variable naming the SQLite database file.
pub const ENV_DATABASE: &str = "STOCKLEDGER_DATABASE";
/// Environment variable holding the token signing secret.
pub const ENV_JWT_SECRET: &str = "STOCKLEDGER_JWT_SECRET";
/// Environment variable overriding issued token lifetime in seconds.
pub const ENV_TOKEN_TTL_SECS: &str = "STOCKLEDGER_TOKEN_TTL_SECS";
/// Environment variable overriding expiry leeway in seconds.
pub const ENV_TOKEN_LEEWAY_SECS: &str = "STOCKLEDGER_TOKEN_LEEWAY_SECS";

/// Configuration failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is absent or empty.
    #[error("missing required setting {0}")]
    Missing(&'static str),
    /// A variable could not be parsed.
    #[error("invalid value for {key}: {value:?}")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Credential verification settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// HMAC signing secret shared with the token issuer.
    pub secret: String,
    /// Lifetime of issued tokens.
    pub token_ttl_secs: u64,
    /// Clock skew tolerated when checking expiry.
    pub leeway_secs: u64,
}

/// Single-writer runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Bound of the command queue in front of the writer.
    pub command_queue_bound: usize,
    /// Capacity of the change-event broadcast channel.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 256,
            event_capacity: 1024,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryConfig {
    /// SQLite file; `None` keeps everything in memory.
    pub database: Option<PathBuf>,
    /// Credential settings.
    pub auth: AuthConfig,
    /// Runtime settings.
    pub runtime: RuntimeConfig,
}

const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

impl InventoryConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, one call per variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let get = |key| lookup(key).filter(|v: &String| !v.trim().is_empty());

        let secret = get(ENV_JWT_SECRET).ok_or(ConfigError::Missing(ENV_JWT_SECRET))?;
        let token_ttl_secs = parse_or(get(ENV_TOKEN_TTL_SECS), ENV_TOKEN_TTL_SECS, DEFAULT_TOKEN_TTL_SECS)?;
        let leeway_secs = parse_or(get(ENV_TOKEN_LEEWAY_SECS), ENV_TOKEN_LEEWAY_SECS, 0)?;

        Ok(Self {
            database: get(ENV_DATABASE).map(PathBuf::from),
            auth: AuthConfig {
                secret,
                token_ttl_secs,
                leeway_secs,
            },
            runtime: RuntimeConfig::default(),
        })
    }
}

fn parse_or(value: Option<String>, key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: v }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
        let map: HashMap<&'static str, String> =
            pairs.iter().map(|(k, v)| (*k, v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn secret_is_required() {
        let err = InventoryConfig::from_lookup(lookup(&[])).expect_err("missing");
        assert_eq!(err, ConfigError::Missing(ENV_JWT_SECRET));
    }

    #[test]
    fn defaults_apply() {
        let cfg = InventoryConfig::from_lookup(lookup(&[(ENV_JWT_SECRET, "k")])).expect("cfg");
        assert_eq!(cfg.database, None);
        assert_eq!(cfg.auth.token_ttl_secs, DEFAULT_TOKEN_TTL_SECS);
        assert_eq!(cfg.auth.leeway_secs, 0);
        assert_eq!(cfg.runtime, RuntimeConfig::default());
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = InventoryConfig::from_lookup(lookup(&[
            (ENV_JWT_SECRET, "k"),
            (ENV_DATABASE, "/tmp/inv.db"),
            (ENV_TOKEN_TTL_SECS, "60"),
            (ENV_TOKEN_LEEWAY_SECS, " 5 "),
        ]))
        .expect("cfg");
        assert_eq!(cfg.database, Some(PathBuf::from("/tmp/inv.db")));
        assert_eq!(cfg.auth.token_ttl_secs, 60);
        assert_eq!(cfg.auth.leeway_secs, 5);
    }

    #[test]
    fn bad_number_is_invalid() {
        let err = InventoryConfig::from_lookup(lookup(&[
            (ENV_JWT_SECRET, "k"),
            (ENV_TOKEN_TTL_SECS, "soon"),
        ]))
        .expect_err("invalid");
        assert!(matches!(err, ConfigError::Invalid { key: ENV_TOKEN_TTL_SECS, .. }));
    }
}
