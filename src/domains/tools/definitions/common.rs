//! Common utilities shared across instruction tools.
//!
//! Argument decoding and validation run before a tool's `execute()`, so a
//! handler body only ever sees well-formed parameters. Results are rendered
//! as pretty-printed JSON text inside the tool response envelope.

use rmcp::model::{CallToolResult, Content, JsonObject};
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::domains::instructions::{InstructionError, Priority};
use crate::domains::tools::ToolError;

/// Parameters of a tool, decoded from the call arguments.
pub trait ToolParams: DeserializeOwned {
    /// Check the constraints the JSON schema declares beyond plain types.
    fn validate(&self) -> Result<(), ToolError> {
        Ok(())
    }
}

/// Decode and validate tool arguments.
pub fn parse_params<P: ToolParams>(arguments: JsonObject) -> Result<P, ToolError> {
    let params: P = serde_json::from_value(serde_json::Value::Object(arguments))
        .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;
    params.validate()?;
    Ok(params)
}

/// Reject a priority outside `1..=5`.
pub fn check_priority(priority: Option<i64>) -> Result<(), ToolError> {
    match priority {
        Some(value) if !Priority::is_valid(value) => Err(ToolError::invalid_arguments(format!(
            "priority must be between {} and {}, got {}",
            Priority::MIN,
            Priority::MAX,
            value
        ))),
        _ => Ok(()),
    }
}

/// Default priority for new instructions.
pub fn default_priority() -> i64 {
    Priority::DEFAULT.into()
}

/// Create a success result carrying `payload` as pretty-printed JSON.
pub fn json_result<T: Serialize>(payload: &T) -> CallToolResult {
    match serde_json::to_string_pretty(payload) {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => error_result(&format!("Failed to serialize result: {}", e)),
    }
}

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// Create an error result from a repository failure.
pub fn instruction_error_result(error: &InstructionError) -> CallToolResult {
    error_result(&error.to_string())
}

#[cfg(test)]
pub(crate) mod test_support {
    use rmcp::model::{CallToolResult, JsonObject, RawContent};
    use std::sync::Arc;

    use crate::core::store::MemoryStore;
    use crate::domains::instructions::InstructionRepository;

    pub fn repository() -> InstructionRepository {
        InstructionRepository::new(Arc::new(MemoryStore::default()))
    }

    pub fn arguments(value: serde_json::Value) -> JsonObject {
        value.as_object().cloned().unwrap_or_default()
    }

    pub fn text(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    pub fn json(result: &CallToolResult) -> serde_json::Value {
        serde_json::from_str(text(result)).expect("tool text should be JSON")
    }

    pub fn is_error(result: &CallToolResult) -> bool {
        result.is_error.unwrap_or(false)
    }
}
