//! Service configuration
//!
//! Loaded from an optional JSON file. Every field has a default, so an
//! empty object (or no file at all) is a valid configuration.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Config {
    /// Read and parse a configuration file
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;

        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config {}: {}", path.display(), e))
    }
}

/// Listener and CORS settings for the HTTP API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port (default: 5000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Browser origins allowed to call the API; empty allows any
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// `host:port` for the listener
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty()
    }
}

/// Connection pool and query behavior for every session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Pool size per session (default: 5)
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Time allowed to acquire a connection (default: 10s)
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Time allowed for one statement (default: 30s)
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// Row cap for unfiltered table slices (default: 5000)
    #[serde(default = "default_table_row_limit")]
    pub table_row_limit: u64,

    /// Check identifiers against the live schema before building (default: true)
    #[serde(default = "default_validate_identifiers")]
    pub validate_identifiers: bool,
}

fn default_max_connections() -> u32 {
    5
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_query_timeout_ms() -> u64 {
    30_000
}

fn default_table_row_limit() -> u64 {
    5000
}

fn default_validate_identifiers() -> bool {
    true
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            connect_timeout_ms: default_connect_timeout_ms(),
            query_timeout_ms: default_query_timeout_ms(),
            table_row_limit: default_table_row_limit(),
            validate_identifiers: default_validate_identifiers(),
        }
    }
}

impl DatabaseConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}
