//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - Name-based dispatch for transports that bypass the rmcp router (HTTP)
//! - Tool metadata for listing

use rmcp::model::{CallToolResult, Tool};
use std::sync::Arc;
use tracing::warn;

use super::ToolError;
use super::definitions::{
    AddInstructionTool, DeleteInstructionTool, GetInstructionsTool, UpdateInstructionTool,
};
use crate::domains::instructions::InstructionRepository;

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
pub struct ToolRegistry {
    repository: Arc<InstructionRepository>,
}

impl ToolRegistry {
    /// Create a new tool registry bound to `repository`.
    pub fn new(repository: Arc<InstructionRepository>) -> Self {
        Self { repository }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            GetInstructionsTool::NAME,
            AddInstructionTool::NAME,
            UpdateInstructionTool::NAME,
            DeleteInstructionTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            GetInstructionsTool::to_tool(),
            AddInstructionTool::to_tool(),
            UpdateInstructionTool::to_tool(),
            DeleteInstructionTool::to_tool(),
        ]
    }

    /// Dispatch a tool call by name.
    ///
    /// Unknown names and malformed arguments are reported as [`ToolError`];
    /// failures inside a tool come back as an error envelope.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<CallToolResult, ToolError> {
        let arguments = match arguments {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => serde_json::Map::new(),
            other => {
                return Err(ToolError::invalid_arguments(format!(
                    "arguments must be an object, got {}",
                    other
                )));
            }
        };

        let repository = self.repository.as_ref();
        match name {
            GetInstructionsTool::NAME => GetInstructionsTool::call(arguments, repository).await,
            AddInstructionTool::NAME => AddInstructionTool::call(arguments, repository).await,
            UpdateInstructionTool::NAME => UpdateInstructionTool::call(arguments, repository).await,
            DeleteInstructionTool::NAME => DeleteInstructionTool::call(arguments, repository).await,
            _ => {
                warn!("Unknown tool requested: {}", name);
                Err(ToolError::not_found(name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::MemoryStore;
    use serde_json::json;

    fn test_registry() -> ToolRegistry {
        let repository = InstructionRepository::new(Arc::new(MemoryStore::default()));
        ToolRegistry::new(Arc::new(repository))
    }

    #[test]
    fn test_registry_tool_names() {
        let registry = test_registry();
        let names = registry.tool_names();
        assert_eq!(names.len(), 4);
        assert!(names.contains(&"get_instructions"));
        assert!(names.contains(&"add_instruction"));
        assert!(names.contains(&"update_instruction"));
        assert!(names.contains(&"delete_instruction"));
    }

    #[test]
    fn test_all_tools_have_descriptions() {
        for tool in ToolRegistry::get_all_tools() {
            assert!(tool.description.is_some_and(|d| !d.is_empty()));
        }
    }

    #[tokio::test]
    async fn test_registry_call_roundtrip() {
        let registry = test_registry();

        let added = registry
            .call_tool(
                "add_instruction",
                json!({ "user_id": "u1", "content": "Answer in French" }),
            )
            .await
            .unwrap();
        assert!(!added.is_error.unwrap_or(false));

        let listed = registry
            .call_tool("get_instructions", json!({ "user_id": "u1" }))
            .await
            .unwrap();
        let text = match &listed.content[0].raw {
            rmcp::model::RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        };
        let payload: serde_json::Value = serde_json::from_str(text).unwrap();
        assert_eq!(payload["count"], 1);
    }

    #[tokio::test]
    async fn test_registry_call_unknown() {
        let registry = test_registry();
        let result = registry.call_tool("unknown", json!({})).await;
        assert!(matches!(result, Err(ToolError::NotFound(name)) if name == "unknown"));
    }

    #[tokio::test]
    async fn test_registry_call_non_object_arguments() {
        let registry = test_registry();
        let result = registry.call_tool("get_instructions", json!([1, 2])).await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[tokio::test]
    async fn test_registry_call_null_arguments_reaches_validation() {
        let registry = test_registry();
        let result = registry
            .call_tool("get_instructions", serde_json::Value::Null)
            .await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(msg)) if msg.contains("user_id")));
    }
}
