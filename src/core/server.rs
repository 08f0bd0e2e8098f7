//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating to the instruction tools and resources.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool.
//! Each tool defines:
//! - Parameters struct (deserialized and schema-checked before running)
//! - `execute()` method (core logic against the repository)
//! - `call()` method (used via ToolRegistry for name-based dispatch)
//!
//! The ToolRouter is built in `domains/tools/router.rs`.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, handler::server::tool::ToolRouter, model::*,
    service::RequestContext, tool_handler,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use super::store::{self, RecordStore};
use crate::domains::{
    instructions::InstructionRepository,
    resources::{ResourceError, ResourceService},
    tools::{ToolError, ToolRegistry, build_tool_router},
};

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp and routes
/// tool calls and resource reads to the shared instruction repository.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Repository shared by every tool and resource.
    repository: Arc<InstructionRepository>,

    /// Service for handling resource-related requests.
    resource_service: Arc<ResourceService>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server over an already opened record store.
    pub fn new(config: Config, store: Arc<dyn RecordStore>) -> Self {
        let config = Arc::new(config);
        let repository = Arc::new(InstructionRepository::new(store));
        let resource_service = Arc::new(ResourceService::new(config.clone(), repository.clone()));

        Self {
            tool_router: build_tool_router::<Self>(repository.clone()),
            config,
            repository,
            resource_service,
        }
    }

    /// Open the configured record store and create a server on top of it.
    pub fn from_config(config: Config) -> crate::Result<Self> {
        let store = store::open(&config.store)?;
        Ok(Self::new(config, store))
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the instruction repository.
    pub fn repository(&self) -> &Arc<InstructionRepository> {
        &self.repository
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    ///
    /// Returns the serialized result envelope. Unknown tools and arguments
    /// that fail the input schema are reported as [`ToolError`].
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let registry = ToolRegistry::new(self.repository.clone());
        let result = registry.call_tool(name, arguments).await?;
        serde_json::to_value(result).map_err(|e| ToolError::internal(e.to_string()))
    }

    /// List all available resources (for HTTP transport).
    pub async fn list_resources(&self) -> Vec<serde_json::Value> {
        let resources = self.resource_service.list_resources().await;

        resources
            .into_iter()
            .map(|r| {
                serde_json::json!({
                    "uri": r.uri,
                    "name": r.name,
                    "description": r.description,
                    "mimeType": r.mime_type
                })
            })
            .collect()
    }

    /// Read a resource by URI (for HTTP transport).
    pub async fn read_resource(&self, uri: &str) -> Result<serde_json::Value, ResourceError> {
        let result = self.resource_service.read_resource(uri).await?;
        Ok(serde_json::json!({
            "contents": result.contents
        }))
    }

    /// List all available resource templates (for HTTP transport).
    pub async fn list_resource_templates(&self) -> Vec<serde_json::Value> {
        let templates = self.resource_service.list_resource_templates().await;

        templates
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "uriTemplate": t.raw.uri_template,
                    "name": t.raw.name,
                    "title": t.raw.title,
                    "description": t.raw.description,
                    "mimeType": t.raw.mime_type
                })
            })
            .collect()
    }
}

fn resource_error(err: ResourceError) -> McpError {
    if err.is_not_found() {
        McpError::resource_not_found(err.to_string(), None)
    } else {
        McpError::internal_error(err.to_string(), None)
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Default::default()
            },
            instructions: Some(
                "Stores per-user instructions with an optional category and a priority from \
                 1 (lowest) to 5 (highest). Use get_instructions to fetch a user's instructions, \
                 and add_instruction, update_instruction or delete_instruction to change them."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        info!("Listing resources");
        let resources = self.resource_service.list_resources().await;
        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        info!("Listing resource templates");
        let templates = self.resource_service.list_resource_templates().await;
        Ok(ListResourceTemplatesResult {
            resource_templates: templates,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        info!("Reading resource: {}", request.uri);
        self.resource_service
            .read_resource(&request.uri)
            .await
            .map_err(resource_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_server() -> McpServer {
        McpServer::from_config(Config::default()).unwrap()
    }

    fn envelope_json(envelope: &serde_json::Value) -> serde_json::Value {
        let text = envelope["content"][0]["text"].as_str().unwrap();
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_get_info() {
        let server = test_server();
        let info = server.get_info();
        assert_eq!(info.server_info.name, server.name());
        assert_eq!(info.server_info.version, server.version());
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
        assert!(info.capabilities.prompts.is_none());
    }

    #[test]
    fn test_list_tools() {
        let server = test_server();
        let names: Vec<String> = server
            .list_tools()
            .iter()
            .map(|t| t["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names.len(), 4);
        for name in [
            "get_instructions",
            "add_instruction",
            "update_instruction",
            "delete_instruction",
        ] {
            assert!(names.iter().any(|n| n == name), "missing {}", name);
        }
    }

    #[tokio::test]
    async fn test_call_tool_round_trip() {
        let server = test_server();

        let added = server
            .call_tool(
                "add_instruction",
                json!({ "user_id": "u1", "content": "Be brief", "priority": 4 }),
            )
            .await
            .unwrap();
        let added = envelope_json(&added);
        let id = added["instruction_id"].as_str().unwrap().to_string();

        let listed = server
            .call_tool("get_instructions", json!({ "user_id": "u1" }))
            .await
            .unwrap();
        let listed = envelope_json(&listed);
        assert_eq!(listed["count"], 1);
        assert_eq!(listed["instructions"][0]["id"], id.as_str());

        let deleted = server
            .call_tool("delete_instruction", json!({ "instruction_id": id }))
            .await
            .unwrap();
        assert_eq!(
            envelope_json(&deleted)["message"],
            "Instruction deleted successfully"
        );
    }

    #[tokio::test]
    async fn test_call_tool_errors() {
        let server = test_server();

        let result = server.call_tool("unknown_tool", json!({})).await;
        assert!(matches!(result, Err(ToolError::NotFound(_))));

        let result = server.call_tool("add_instruction", json!({ "user_id": "u1" })).await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[tokio::test]
    async fn test_resources() {
        let server = test_server();
        assert_eq!(server.list_resources().await.len(), 3);
        assert_eq!(server.list_resource_templates().await.len(), 1);

        let info = server
            .read_resource("instructions://server/info")
            .await
            .unwrap();
        assert!(info["contents"].is_array());

        let missing = server.read_resource("instructions://missing").await;
        assert!(matches!(missing, Err(ResourceError::NotFound(_))));
    }

    #[test]
    fn test_resource_error_mapping() {
        let err = resource_error(ResourceError::not_found("x"));
        assert_eq!(err.code, ErrorCode::RESOURCE_NOT_FOUND);

        let err = resource_error(ResourceError::internal("boom"));
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
    }

    /// Write one line-delimited JSON-RPC message.
    async fn send<W: tokio::io::AsyncWrite + Unpin>(writer: &mut W, message: serde_json::Value) {
        use tokio::io::AsyncWriteExt;
        let mut line = message.to_string();
        line.push('\n');
        writer.write_all(line.as_bytes()).await.unwrap();
        writer.flush().await.unwrap();
    }

    /// Read messages until the response carrying `id` arrives.
    async fn response<R: tokio::io::AsyncBufRead + Unpin>(
        lines: &mut tokio::io::Lines<R>,
        id: i64,
    ) -> serde_json::Value {
        loop {
            let line = lines.next_line().await.unwrap().expect("server closed stream");
            let message: serde_json::Value = serde_json::from_str(&line).unwrap();
            if message["id"] == id {
                return message;
            }
        }
    }

    #[tokio::test]
    async fn test_routed_tool_calls_over_session() {
        use rmcp::ServiceExt;
        use tokio::io::{AsyncBufReadExt, BufReader};

        let (client, server_io) = tokio::io::duplex(64 * 1024);
        let server = test_server();
        let session = tokio::spawn(async move {
            let running = server.serve(server_io).await.unwrap();
            let _ = running.waiting().await;
        });

        let (reader, mut writer) = tokio::io::split(client);
        let mut lines = BufReader::new(reader).lines();

        send(
            &mut writer,
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "initialize",
                "params": {
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": { "name": "test-client", "version": "0.1.0" }
                }
            }),
        )
        .await;
        let init = response(&mut lines, 1).await;
        assert_eq!(init["result"]["serverInfo"]["name"], "Instruction MCP Server");

        send(
            &mut writer,
            json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
        )
        .await;

        // Missing `content` fails argument decoding inside the route.
        send(
            &mut writer,
            json!({
                "jsonrpc": "2.0",
                "id": 2,
                "method": "tools/call",
                "params": { "name": "add_instruction", "arguments": { "user_id": "u1" } }
            }),
        )
        .await;
        let rejected = response(&mut lines, 2).await;
        assert_eq!(rejected["error"]["code"], -32602);
        assert!(
            rejected["error"]["message"]
                .as_str()
                .unwrap()
                .contains("Invalid arguments")
        );

        send(
            &mut writer,
            json!({
                "jsonrpc": "2.0",
                "id": 3,
                "method": "tools/call",
                "params": {
                    "name": "add_instruction",
                    "arguments": { "user_id": "u1", "content": "Be brief" }
                }
            }),
        )
        .await;
        let added = response(&mut lines, 3).await;
        assert!(added.get("error").is_none());
        assert_eq!(added["result"]["isError"], false);

        session.abort();
    }
}
