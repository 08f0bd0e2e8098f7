//! Resource service implementation.
//!
//! The ResourceService manages resource discovery and access. Every resource
//! here is dynamic: its content is rendered from the instruction repository
//! (or the server configuration) on each read.
//!
//! Resources are defined in `definitions/` and registered via `registry.rs`.

use rmcp::model::{ReadResourceResult, Resource, ResourceContents, ResourceTemplate};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::error::ResourceError;
use super::registry::{USER_INSTRUCTIONS_PREFIX, get_all_resource_templates, get_all_resources};
use crate::core::config::Config;
use crate::domains::instructions::{InstructionList, InstructionRepository};

/// Service for managing and accessing resources.
pub struct ResourceService {
    /// Server configuration, rendered by the server info resource.
    config: Arc<Config>,

    /// Repository the instruction resources read from.
    repository: Arc<InstructionRepository>,

    /// Registry of available resources.
    /// Key: resource URI, Value: resource metadata
    resources: HashMap<String, ResourceEntry>,

    /// Resource templates for parameterized resources.
    templates: Vec<ResourceTemplate>,
}

/// An entry in the resource registry.
#[derive(Debug, Clone)]
pub struct ResourceEntry {
    /// The resource metadata.
    pub resource: Resource,

    /// What to render when the resource is read.
    pub kind: ResourceKind,
}

/// Kinds of dynamic resource content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Distinct categories across all instructions.
    Categories,

    /// Every instruction across all users.
    AllInstructions,

    /// Server identity and store settings.
    ServerInfo,
}

#[derive(Serialize)]
struct CategoriesContent {
    categories: Vec<String>,
    count: usize,
}

#[derive(Serialize)]
struct ServerInfoContent<'a> {
    name: &'a str,
    version: &'a str,
    region: &'a str,
    table_name: &'a str,
    store_backend: &'a str,
}

impl ResourceService {
    /// Create a new ResourceService.
    pub fn new(config: Arc<Config>, repository: Arc<InstructionRepository>) -> Self {
        info!("Initializing ResourceService");

        let mut service = Self {
            config,
            repository,
            resources: HashMap::new(),
            templates: Vec::new(),
        };

        // Register all resources and templates from registry
        service.register_from_registry();
        service.templates = get_all_resource_templates();

        service
    }

    /// Register all resources from the registry.
    fn register_from_registry(&mut self) {
        for entry in get_all_resources() {
            self.register_resource(entry);
        }
    }

    /// Register a resource.
    pub fn register_resource(&mut self, entry: ResourceEntry) {
        info!("Registering resource: {}", entry.resource.raw.uri);
        self.resources
            .insert(entry.resource.raw.uri.to_string(), entry);
    }

    /// List all available resources.
    pub async fn list_resources(&self) -> Vec<Resource> {
        self.resources
            .values()
            .map(|entry| entry.resource.clone())
            .collect()
    }

    /// List all available resource templates.
    pub async fn list_resource_templates(&self) -> Vec<ResourceTemplate> {
        self.templates.clone()
    }

    /// Read a resource by URI.
    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        let text = if let Some(entry) = self.resources.get(uri) {
            self.render(entry.kind).await?
        } else if let Some(user_id) = uri.strip_prefix(USER_INSTRUCTIONS_PREFIX) {
            if user_id.is_empty() || user_id.contains('/') {
                return Err(ResourceError::invalid_uri(uri));
            }
            let list = self.repository.list(user_id, None).await?;
            to_json(&list)?
        } else {
            return Err(ResourceError::not_found(uri));
        };

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, uri)],
        })
    }

    /// Render the content of a registered resource.
    async fn render(&self, kind: ResourceKind) -> Result<String, ResourceError> {
        match kind {
            ResourceKind::Categories => {
                let categories = self.repository.list_categories().await?;
                to_json(&CategoriesContent {
                    count: categories.len(),
                    categories,
                })
            }
            ResourceKind::AllInstructions => {
                let instructions = self.repository.list_all().await?;
                to_json(&InstructionList::from(instructions))
            }
            ResourceKind::ServerInfo => to_json(&ServerInfoContent {
                name: &self.config.server.name,
                version: &self.config.server.version,
                region: &self.config.store.region,
                table_name: self.repository.store().table_name(),
                store_backend: self.repository.store().backend(),
            }),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ResourceError> {
    serde_json::to_string_pretty(value).map_err(|e| ResourceError::internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::MemoryStore;
    use crate::domains::instructions::NewInstruction;

    fn test_service() -> ResourceService {
        let repository = InstructionRepository::new(Arc::new(MemoryStore::default()));
        ResourceService::new(Arc::new(Config::default()), Arc::new(repository))
    }

    fn read_json(result: &ReadResourceResult) -> serde_json::Value {
        match &result.contents[0] {
            ResourceContents::TextResourceContents { text, .. } => {
                serde_json::from_str(text).unwrap()
            }
            _ => panic!("Expected text resource contents"),
        }
    }

    #[tokio::test]
    async fn test_resource_service_creation() {
        let service = test_service();
        assert_eq!(service.list_resources().await.len(), 3);
        assert_eq!(service.list_resource_templates().await.len(), 1);
    }

    #[tokio::test]
    async fn test_read_categories() {
        let service = test_service();
        for category in ["a", "b", "a"] {
            service
                .repository
                .add(NewInstruction::new("u1", "x").with_category(category))
                .await
                .unwrap();
        }
        service
            .repository
            .add(NewInstruction::new("u2", "y"))
            .await
            .unwrap();

        let result = service
            .read_resource("instructions://categories")
            .await
            .unwrap();
        let payload = read_json(&result);
        assert_eq!(payload["count"], 2);
        let categories = payload["categories"].as_array().unwrap();
        assert!(categories.contains(&serde_json::json!("a")));
        assert!(categories.contains(&serde_json::json!("b")));
    }

    #[tokio::test]
    async fn test_read_all_instructions() {
        let service = test_service();
        service
            .repository
            .add(NewInstruction::new("u1", "x"))
            .await
            .unwrap();
        service
            .repository
            .add(NewInstruction::new("u2", "y"))
            .await
            .unwrap();

        let result = service.read_resource("instructions://all").await.unwrap();
        assert_eq!(read_json(&result)["count"], 2);
    }

    #[tokio::test]
    async fn test_read_user_template() {
        let service = test_service();
        service
            .repository
            .add(NewInstruction::new("u1", "low").with_priority(1))
            .await
            .unwrap();
        service
            .repository
            .add(NewInstruction::new("u1", "high").with_priority(5))
            .await
            .unwrap();
        service
            .repository
            .add(NewInstruction::new("u2", "other"))
            .await
            .unwrap();

        let result = service
            .read_resource("instructions://users/u1")
            .await
            .unwrap();
        let payload = read_json(&result);
        assert_eq!(payload["count"], 2);
        assert_eq!(payload["instructions"][0]["content"], "high");
    }

    #[tokio::test]
    async fn test_read_server_info() {
        let service = test_service();
        let result = service
            .read_resource("instructions://server/info")
            .await
            .unwrap();
        let payload = read_json(&result);
        assert_eq!(payload["name"], "Instruction MCP Server");
        assert_eq!(payload["region"], "us-east-1");
        assert_eq!(payload["table_name"], "InstructionTable");
        assert_eq!(payload["store_backend"], "memory");
    }

    #[tokio::test]
    async fn test_read_nonexistent_resource() {
        let service = test_service();

        let result = service.read_resource("instructions://nonexistent").await;
        assert!(matches!(result, Err(ResourceError::NotFound(_))));

        let result = service.read_resource("instructions://users/").await;
        assert!(matches!(result, Err(ResourceError::InvalidUri(_))));
    }
}
