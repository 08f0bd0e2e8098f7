//! Update instruction tool definition.
//!
//! Applies a partial update: only the fields present in the call arguments
//! are changed.

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
    ToolParams, check_priority, instruction_error_result, json_result, parse_params,
};
use crate::domains::instructions::{Instruction, InstructionPatch, InstructionRepository};
use crate::domains::tools::ToolError;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the update instruction tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateInstructionParams {
    /// The ID of the instruction to update
    pub instruction_id: String,

    /// The instruction content
    #[serde(default)]
    pub content: Option<String>,

    /// The category of the instruction
    #[serde(default)]
    pub category: Option<String>,

    /// The priority of the instruction (1-5, with 5 being highest)
    #[serde(default)]
    #[schemars(range(min = 1, max = 5))]
    pub priority: Option<i64>,
}

impl ToolParams for UpdateInstructionParams {
    fn validate(&self) -> Result<(), ToolError> {
        check_priority(self.priority)
    }
}

impl UpdateInstructionParams {
    fn patch(&self) -> InstructionPatch {
        InstructionPatch {
            content: self.content.clone(),
            category: self.category.clone(),
            priority: self.priority,
        }
    }
}

// ============================================================================
// Output Structure
// ============================================================================

/// Result of an update operation.
#[derive(Debug, Serialize)]
struct UpdateInstructionResult<'a> {
    instruction_id: &'a str,
    message: &'static str,
    instruction: &'a Instruction,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Update instruction tool.
pub struct UpdateInstructionTool;

impl UpdateInstructionTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "update_instruction";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Update an existing instruction";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(instruction_id = %params.instruction_id))]
    pub async fn execute(
        params: &UpdateInstructionParams,
        repository: &InstructionRepository,
    ) -> CallToolResult {
        info!("Update instruction called");

        match repository
            .update(&params.instruction_id, params.patch())
            .await
        {
            Ok(instruction) => json_result(&UpdateInstructionResult {
                instruction_id: &params.instruction_id,
                message: "Instruction updated successfully",
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
        let params: UpdateInstructionParams = parse_params(arguments)?;
        Ok(Self::execute(&params, repository).await)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<UpdateInstructionParams>().into(),
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
