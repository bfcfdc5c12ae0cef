//! Server configuration loaded from environment variables.
//!
//! - `PIZZERIA_DB_PATH`: SQLite database file path (default: "pizzeria.db")
//! - `PIZZERIA_HOST`: listen address (default: "0.0.0.0")
//! - `PIZZERIA_PORT`: listen port (default: "3000")

use thiserror::Error;

pub const DB_PATH_VAR: &str = "PIZZERIA_DB_PATH";
pub const HOST_VAR: &str = "PIZZERIA_HOST";
pub const PORT_VAR: &str = "PIZZERIA_PORT";

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub db_path: String,
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            db_path: "pizzeria.db".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Unset keys fall
    /// back to [`ServerConfig::default`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServerConfig::default();
        let port = match lookup(PORT_VAR) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: PORT_VAR,
                message: format!("{:?}: {}", raw, e),
            })?,
            None => defaults.port,
        };

        Ok(ServerConfig {
            db_path: lookup(DB_PATH_VAR).unwrap_or(defaults.db_path),
            host: lookup(HOST_VAR).unwrap_or(defaults.host),
            port,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
