//! Domains module containing business logic organized by bounded contexts.
//!
//! - `instructions` - the instruction model and repository
//! - `tools` - MCP tools wrapping the repository operations
//! - `resources` - read-only views over the stored instructions

pub mod instructions;
pub mod resources;
pub mod tools;
