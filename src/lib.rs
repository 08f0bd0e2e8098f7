//! Instruction MCP Server Library
//!
//! A Model Context Protocol (MCP) server that stores short per-user
//! instructions in a record store and exposes them to MCP clients.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the record store adapter, the
//!   server handler and the transports
//! - **domains**: business logic organized by bounded contexts
//!   - **instructions**: the instruction model and repository
//!   - **tools**: `get_instructions`, `add_instruction`, `update_instruction`
//!     and `delete_instruction`
//!   - **resources**: read-only views over the stored instructions
//!
//! # Example
//!
//! ```rust,no_run
//! use instruction_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let transport = TransportService::new(config.transport.clone());
//!     let server = McpServer::from_config(config)?;
//!     transport.run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
