//! Instruction categories resource definition.

use super::ResourceDefinition;
use crate::domains::resources::service::ResourceKind;

/// Distinct categories used across all instructions.
pub struct CategoriesResource;

impl ResourceDefinition for CategoriesResource {
    const URI: &'static str = "instructions://categories";
    const NAME: &'static str = "Instruction Categories";
    const DESCRIPTION: &'static str = "Distinct non-empty categories used across all instructions";
    const KIND: ResourceKind = ResourceKind::Categories;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_metadata() {
        assert_eq!(CategoriesResource::URI, "instructions://categories");
        assert_eq!(CategoriesResource::MIME_TYPE, "application/json");
        assert_eq!(CategoriesResource::KIND, ResourceKind::Categories);
    }
}
