//! Get instructions tool definition.
//!
//! Lists a user's instructions, highest priority first, optionally filtered
//! by category.

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

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the get instructions tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetInstructionsParams {
    /// The ID of the user
    pub user_id: String,

    /// Filter instructions by category
    #[serde(default)]
    pub category: Option<String>,
}

impl ToolParams for GetInstructionsParams {}

// ============================================================================
// Tool Definition
// ============================================================================

/// Get instructions tool.
pub struct GetInstructionsTool;

impl GetInstructionsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_instructions";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get all instructions or filter by category";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(user_id = %params.user_id))]
    pub async fn execute(
        params: &GetInstructionsParams,
        repository: &InstructionRepository,
    ) -> CallToolResult {
        info!(
            "Get instructions called (category: {:?})",
            params.category.as_deref()
        );

        match repository
            .list(&params.user_id, params.category.as_deref())
            .await
        {
            Ok(list) => json_result(&list),
            Err(e) => instruction_error_result(&e),
        }
    }

    /// Decode raw arguments and execute.
    pub async fn call(
        arguments: JsonObject,
        repository: &InstructionRepository,
    ) -> Result<CallToolResult, ToolError> {
        let params: GetInstructionsParams = parse_params(arguments)?;
        Ok(Self::execute(&params, repository).await)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<GetInstructionsParams>().into(),
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
