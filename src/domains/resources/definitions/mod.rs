//! Resource definitions module.
//!
//! Each resource is defined in its own file with its URI, metadata and the
//! kind of content the service renders for it.
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file (e.g., `my_resource.rs`)
//! 2. Implement the `ResourceDefinition` trait
//! 3. Export it here
//! 4. Register in `registry.rs`

mod all_instructions;
mod categories;
mod server_info;

pub use all_instructions::AllInstructionsResource;
pub use categories::CategoriesResource;
pub use server_info::ServerInfoResource;

use super::service::ResourceKind;

/// Trait for resource definitions.
pub trait ResourceDefinition {
    /// The unique URI of the resource.
    const URI: &'static str;

    /// The display name of the resource.
    const NAME: &'static str;

    /// A description of the resource.
    const DESCRIPTION: &'static str;

    /// The MIME type of the resource content.
    const MIME_TYPE: &'static str = "application/json";

    /// What the service renders when the resource is read.
    const KIND: ResourceKind;
}
