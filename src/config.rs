//! Configuration loading and management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming the HTTP port.
pub const ENV_PORT: &str = "TODO_PORT";
/// Environment variable naming the SQLite database file.
pub const ENV_DB_FILE: &str = "TODO_DBFILE";

/// Server configuration, read once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the SQLite database file.
    #[serde(default = "default_db_file")]
    pub db_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            db_file: default_db_file(),
        }
    }
}

fn default_port() -> u16 {
    7540
}

fn default_db_file() -> PathBuf {
    PathBuf::from("scheduler.db")
}

impl Config {
    /// Build a config from `TODO_PORT` / `TODO_DBFILE`, falling back to the
    /// defaults for unset or empty variables.
    pub fn from_env() -> Result<Self> {
        let port = match std::env::var(ENV_PORT) {
            Ok(value) if !value.is_empty() => value
                .parse()
                .with_context(|| format!("invalid {}: {}", ENV_PORT, value))?,
            _ => default_port(),
        };

        let db_file = match std::env::var(ENV_DB_FILE) {
            Ok(value) if !value.is_empty() => PathBuf::from(value),
            _ => default_db_file(),
        };

        Ok(Self { port, db_file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.port, 7540);
        assert_eq!(config.db_file, PathBuf::from("scheduler.db"));
    }
}
