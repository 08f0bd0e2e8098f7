//! Delete instruction tool definition.
//!
//! Deletion is unconditional: an unknown id is reported as deleted.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};

use super::common::{ToolParams, instruction_error_result, json_result, parse_params};
use crate::domains::instructions::InstructionRepository;
use crate::domains::tools::ToolError;

/// Parameters for the delete instruction tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteInstructionParams {
    /// The ID of the instruction to delete
    pub instruction_id: String,
}

impl ToolParams for DeleteInstructionParams {}

/// Delete instruction tool.
pub struct DeleteInstructionTool;

impl DeleteInstructionTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "delete_instruction";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Delete an instruction";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(instruction_id = %params.instruction_id))]
    pub async fn execute(
        params: &DeleteInstructionParams,
        repository: &InstructionRepository,
    ) -> CallToolResult {
        info!("Delete instruction called");

        match repository.delete(&params.instruction_id).await {
            Ok(confirmation) => json_result(&confirmation),
            Err(e) => instruction_error_result(&e),
        }
    }

    /// Decode raw arguments and execute.
    pub async fn call(
        arguments: JsonObject,
        repository: &InstructionRepository,
    ) -> Result<CallToolResult, ToolError> {
        let params: DeleteInstructionParams = parse_params(arguments)?;
        Ok(Self::execute(&params, repository).await)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<DeleteInstructionParams>().into(),
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
