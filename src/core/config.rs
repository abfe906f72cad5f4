//! Configuration management for redis-repl
//!
//! Sources, highest priority first: CLI flags (applied by the binary),
//! environment variables, the config file, hard-coded defaults.
//!
//! Config file location: ~/.config/redis-repl/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::core::error::{ReplError, Result};

/// Default port for plain-text connections
pub const DEFAULT_PORT: u16 = 6379;

/// Default port for TLS connections
pub const DEFAULT_TLS_PORT: u16 = 6380;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Main configuration for redis-repl
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server connection settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host name or address (default: 127.0.0.1)
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number; falls back to 6379, or 6380 with TLS
    #[serde(default)]
    pub port: Option<u16>,
    /// Password sent with AUTH after connecting
    #[serde(default)]
    pub password: Option<String>,
    /// Whether to wrap the connection in TLS
    #[serde(default)]
    pub tls: bool,
}

/// Logging settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Emit debug-level logs to stderr
    #[serde(default)]
    pub debug: bool,
    /// Explicit tracing filter; RUST_LOG still wins
    #[serde(default)]
    pub filter: Option<String>,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: None,
            password: None,
            tls: false,
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("redis-repl")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults.
    ///
    /// Runs before logging is set up, so problems that should not stop
    /// startup are returned as warnings for the caller to log.
    pub fn load() -> (Self, Vec<String>) {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        let mut warnings = Vec::new();
        let mut config = if Self::config_file().exists() {
            Self::load_from_file().unwrap_or_else(|e| {
                warnings.push(format!("using default configuration: {}", e));
                Self::default()
            })
        } else {
            Self::default()
        };
        warnings.extend(config.apply_env(|key| env::var(key).ok()));
        (config, warnings)
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::config_file();

        if !config_path.exists() {
            return Err(ReplError::config("Config file not found"));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| ReplError::config(format!("Failed to read config: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ReplError::config(format!("Failed to parse config: {}", e)))
    }

    /// Overlay environment variables read through `lookup`.
    ///
    /// Returns a warning for each value that could not be used.
    pub fn apply_env<F>(&mut self, lookup: F) -> Vec<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut warnings = Vec::new();
        if let Some(host) = lookup("REDIS_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("REDIS_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = Some(port),
                Err(_) => warnings.push(format!("ignoring invalid REDIS_PORT value {:?}", port)),
            }
        }
        if let Some(password) = lookup("REDIS_PASSWORD") {
            self.server.password = Some(password);
        }
        if let Some(tls) = lookup("REDIS_TLS") {
            self.server.tls = is_truthy(&tls);
        }
        if let Some(debug) = lookup("REDIS_REPL_DEBUG") {
            self.logging.debug = is_truthy(&debug);
        }
        warnings
    }

    /// Port to connect to, honouring the TLS default
    pub fn port(&self) -> u16 {
        self.server.port.unwrap_or(if self.server.tls {
            DEFAULT_TLS_PORT
        } else {
            DEFAULT_PORT
        })
    }

    /// Get the socket address
    pub fn addr(&self) -> String {
        format!("{}:{}", self.server.host, self.port())
    }

    /// Filter expression for the log subscriber
    pub fn log_filter(&self) -> String {
        match &self.logging.filter {
            Some(filter) => filter.clone(),
            None if self.logging.debug => "debug".to_string(),
            None => "warn".to_string(),
        }
    }
}
