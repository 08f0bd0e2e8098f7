//! Add instruction tool definition.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

use super::common::{
    ToolParams, check_priority, default_priority, instruction_error_result, json_result,
    parse_params,
};
use crate::domains::instructions::{Instruction, InstructionRepository, NewInstruction};
use crate::domains::tools::ToolError;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the add instruction tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AddInstructionParams {
    /// The ID of the user
    pub user_id: String,

    /// The instruction content
    pub content: String,

    /// The category of the instruction
    #[serde(default)]
    pub category: Option<String>,

    /// The priority of the instruction (1-5, with 5 being highest)
    #[serde(default = "default_priority")]
    #[schemars(range(min = 1, max = 5))]
    pub priority: i64,
}

impl ToolParams for AddInstructionParams {
    fn validate(&self) -> Result<(), ToolError> {
        check_priority(Some(self.priority))
    }
}

// ============================================================================
// Output Structure
// ============================================================================

/// Result of an add operation.
#[derive(Debug, Serialize)]
struct AddInstructionResult<'a> {
    instruction_id: &'a str,
    message: &'static str,
    instruction: &'a Instruction,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Add instruction tool.
pub struct AddInstructionTool;

impl AddInstructionTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "add_instruction";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Add a new instruction";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(user_id = %params.user_id))]
    pub async fn execute(
        params: &AddInstructionParams,
        repository: &InstructionRepository,
    ) -> CallToolResult {
        info!("Add instruction called");

        let new = NewInstruction {
            user_id: params.user_id.clone(),
            content: params.content.clone(),
            category: params.category.clone(),
            priority: Some(params.priority),
        };

        match repository.add(new).await {
            Ok(instruction) => json_result(&AddInstructionResult {
                instruction_id: &instruction.id,
                message: "Instruction added successfully",
                instruction: &instruction,
            }),
            Err(e) => instruction_error_result(&e),
        }
    }

    /// Decode raw arguments and execute.
    pub async fn call(
        arguments: JsonObject,
        repository: &InstructionRepository,
    ) -> Result<CallToolResult, ToolError> {
        let params: AddInstructionParams = parse_params(arguments)?;
        Ok(Self::execute(&params, repository).await)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<AddInstructionParams>().into(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>(repository: Arc<InstructionRepository>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let repository = repository.clone();
            async move {
                Self::call(args, &repository)
                    .await
                    .map_err(|e| McpError::invalid_params(e.to_string(), None))
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::super::common::test_support::*;
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_add_with_defaults() {
        let repository = repository();
        let result = AddInstructionTool::call(
            arguments(json!({ "user_id": "u1", "content": "Be concise" })),
            &repository,
        )
        .await
        .unwrap();

        assert!(!is_error(&result));
        let payload = json(&result);
        assert_eq!(payload["message"], "Instruction added successfully");
        assert_eq!(payload["instruction"]["priority"], 3);
        assert_eq!(payload["instruction"]["content"], "Be concise");
        assert!(payload["instruction"].get("category").is_none());
        assert_eq!(payload["instruction_id"], payload["instruction"]["id"]);

        let listed = repository.list("u1", None).await.unwrap();
        assert_eq!(listed.count, 1);
    }

    #[tokio::test]
    async fn test_add_with_category_and_priority() {
        let repository = repository();
        let result = AddInstructionTool::call(
            arguments(json!({
                "user_id": "u1",
                "content": "Use metric units",
                "category": "units",
                "priority": 5
            })),
            &repository,
        )
        .await
        .unwrap();

        let payload = json(&result);
        assert_eq!(payload["instruction"]["category"], "units");
        assert_eq!(payload["instruction"]["priority"], 5);
    }

    #[tokio::test]
    async fn test_add_empty_content_is_error_envelope() {
        let repository = repository();
        let params = AddInstructionParams {
            user_id: "u1".to_string(),
            content: String::new(),
            category: None,
            priority: 3,
        };

        let result = AddInstructionTool::execute(&params, &repository).await;
        assert!(is_error(&result));
        assert!(text(&result).contains("Instruction content cannot be empty"));
        assert_eq!(repository.list_all().await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_add_out_of_range_priority_rejected_before_handler() {
        let repository = repository();
        let result = AddInstructionTool::call(
            arguments(json!({ "user_id": "u1", "content": "x", "priority": 9 })),
            &repository,
        )
        .await;

        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
        assert!(repository.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_out_of_range_priority_coerced_by_repository() {
        let repository = repository();
        let params = AddInstructionParams {
            user_id: "u1".to_string(),
            content: "x".to_string(),
            category: None,
            priority: 9,
        };

        let result = AddInstructionTool::execute(&params, &repository).await;
        assert_eq!(json(&result)["instruction"]["priority"], 3);
    }

    #[tokio::test]
    async fn test_add_missing_content_rejected() {
        let repository = repository();
        let result =
            AddInstructionTool::call(arguments(json!({ "user_id": "u1" })), &repository).await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[test]
    fn test_tool_schema_declares_bounds() {
        let tool = AddInstructionTool::to_tool();
        assert_eq!(tool.name, "add_instruction");

        let schema = serde_json::Value::Object((*tool.input_schema).clone());
        let priority = &schema["properties"]["priority"];
        assert_eq!(priority["minimum"].as_f64(), Some(1.0));
        assert_eq!(priority["maximum"].as_f64(), Some(5.0));

        let required = schema["required"].as_array().unwrap();
        assert!(required.contains(&json!("user_id")));
        assert!(required.contains(&json!("content")));
        assert!(!required.contains(&json!("priority")));
    }
}
