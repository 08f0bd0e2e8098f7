//! Resource Registry - central registration of all resources.
//!
//! When adding a new resource:
//! 1. Create the resource file in `definitions/`
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it here in `get_all_resources()`

use rmcp::model::{AnnotateAble, RawResource, RawResourceTemplate, ResourceTemplate};

use super::definitions::{
    AllInstructionsResource, CategoriesResource, ResourceDefinition, ServerInfoResource,
};
use super::service::ResourceEntry;

/// URI template listing one user's instructions.
pub const USER_INSTRUCTIONS_TEMPLATE: &str = "instructions://users/{user_id}";

/// Prefix of URIs produced by [`USER_INSTRUCTIONS_TEMPLATE`].
pub const USER_INSTRUCTIONS_PREFIX: &str = "instructions://users/";

/// Helper function to create an annotated resource from a definition.
fn build_resource<R: ResourceDefinition>() -> ResourceEntry {
    let mut raw = RawResource::new(R::URI, R::NAME);
    raw.description = Some(R::DESCRIPTION.to_string());
    raw.mime_type = Some(R::MIME_TYPE.to_string());

    ResourceEntry {
        resource: raw.no_annotation(),
        kind: R::KIND,
    }
}

/// Get all registered resources as ResourceEntries.
pub fn get_all_resources() -> Vec<ResourceEntry> {
    vec![
        build_resource::<CategoriesResource>(),
        build_resource::<AllInstructionsResource>(),
        build_resource::<ServerInfoResource>(),
    ]
}

/// Get all registered resource templates.
///
/// Resource templates use URI templates (RFC 6570) to describe
/// parameterized resources that clients can fill in.
pub fn get_all_resource_templates() -> Vec<ResourceTemplate> {
    vec![
        RawResourceTemplate {
            uri_template: USER_INSTRUCTIONS_TEMPLATE.to_string(),
            name: "User Instructions".to_string(),
            title: Some("Instructions of a User".to_string()),
            description: Some(
                "A user's instructions, highest priority first".to_string(),
            ),
            mime_type: Some("application/json".to_string()),
        }
        .no_annotation(),
    ]
}

/// Get the list of all resource URIs.
pub fn resource_uris() -> Vec<&'static str> {
    vec![
        CategoriesResource::URI,
        AllInstructionsResource::URI,
        ServerInfoResource::URI,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_all_resources() {
        let resources = get_all_resources();
        assert_eq!(resources.len(), 3);

        let uris: Vec<_> = resources
            .iter()
            .map(|r| r.resource.raw.uri.as_str())
            .collect();
        assert!(uris.contains(&"instructions://categories"));
        assert!(uris.contains(&"instructions://all"));
        assert!(uris.contains(&"instructions://server/info"));
    }

    #[test]
    fn test_get_all_resource_templates() {
        let templates = get_all_resource_templates();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].raw.uri_template, USER_INSTRUCTIONS_TEMPLATE);
        assert!(USER_INSTRUCTIONS_TEMPLATE.starts_with(USER_INSTRUCTIONS_PREFIX));
    }

    #[test]
    fn test_resource_uris() {
        let uris = resource_uris();
        assert_eq!(uris.len(), get_all_resources().len());
        assert!(uris.contains(&"instructions://server/info"));
    }
}
