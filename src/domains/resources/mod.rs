//! Resources domain module.
//!
//! Read-only views over the instruction store that MCP clients can fetch
//! without calling a tool: the category set, every instruction, one user's
//! instructions (through a URI template), and the server's own settings.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual resource definitions (one file per resource)
//! - `registry.rs` - Central resource registration
//! - `service.rs` - Resource service for listing and reading
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file in `definitions/` (e.g., `my_resource.rs`)
//! 2. Implement the `ResourceDefinition` trait
//! 3. Export in `definitions/mod.rs`
//! 4. Register in `registry.rs`

pub mod definitions;
mod error;
mod registry;
mod service;

pub use definitions::ResourceDefinition;
pub use error::ResourceError;
pub use registry::{
    USER_INSTRUCTIONS_PREFIX, USER_INSTRUCTIONS_TEMPLATE, get_all_resources, resource_uris,
};
pub use service::{ResourceEntry, ResourceKind, ResourceService};
