//! All-instructions resource definition.

use super::ResourceDefinition;
use crate::domains::resources::service::ResourceKind;

/// Every instruction across all users, for administration and debugging.
pub struct AllInstructionsResource;

impl ResourceDefinition for AllInstructionsResource {
    const URI: &'static str = "instructions://all";
    const NAME: &'static str = "All Instructions";
    const DESCRIPTION: &'static str = "Every stored instruction across all users";
    const KIND: ResourceKind = ResourceKind::AllInstructions;
}
