//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables or defaults. The configuration is
//! read once at startup and passed explicitly to the components that need it.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default region reported for the record store.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default name of the instruction table.
pub const DEFAULT_TABLE_NAME: &str = "InstructionTable";

/// Default server name reported to clients.
pub const DEFAULT_SERVER_NAME: &str = "Instruction MCP Server";

/// Main configuration structure for the MCP server.
///
/// This struct contains all configurable aspects of the server, organized
/// by concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Record store configuration.
    pub store: StoreConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Record store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Region the store lives in (reported in server info and logs).
    pub region: String,

    /// Name of the table holding instruction records.
    pub table_name: String,

    /// Which backend holds the records.
    pub backend: StoreBackend,
}

/// Record store backend selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreBackend {
    /// In-process table; contents are lost on exit.
    Memory,

    /// Embedded redb database file.
    Redb {
        /// Path of the database file.
        path: PathBuf,
    },
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            backend: StoreBackend::Memory,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: DEFAULT_SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            store: StoreConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Server settings use the `MCP_` prefix (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`, ...). The store keeps the conventional `AWS_REGION`
    /// and `INSTRUCTION_TABLE_NAME` names. Unset variables fall back to the
    /// defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(version) = std::env::var("MCP_SERVER_VERSION") {
            config.server.version = version;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(region) = std::env::var("AWS_REGION") {
            config.store.region = region;
        }

        if let Ok(table_name) = std::env::var("INSTRUCTION_TABLE_NAME") {
            config.store.table_name = table_name;
        }

        if let Ok(path) = std::env::var("MCP_STORE_PATH") {
            config.store.backend = StoreBackend::Redb {
                path: PathBuf::from(path),
            };
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        config
    }
}
