// MCP server: request dispatch and the stdio transport loop

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::protocol::{
    error_codes, CallToolParams, InitializeResult, JsonRpcRequest, JsonRpcResponse,
    ServerCapabilities, ServerInfo, PROTOCOL_VERSION,
};
use crate::tools::ToolRegistry;

/// MCP server over newline-delimited JSON-RPC.
///
/// Dispatch is driven entirely by the tool registry; the server itself knows
/// nothing about WolframAlpha.
pub struct McpServer {
    registry: ToolRegistry,
    info: ServerInfo,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            info: ServerInfo {
                name: "wolframalpha-llm".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    /// Handle one request. Notifications are consumed without a response.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.method.starts_with("notifications/") {
            tracing::debug!(method = %request.method, "notification consumed");
            return None;
        }

        Some(match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "tools/list" => self.handle_list_tools(request.id),
            "tools/call" => self.handle_call_tool(request.id, request.params).await,
            other => JsonRpcResponse::error(
                request.id,
                error_codes::METHOD_NOT_FOUND,
                format!("Unknown method: {other}"),
            ),
        })
    }

    fn handle_initialize(&self, id: Option<serde_json::Value>) -> JsonRpcResponse {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: serde_json::json!({}),
            },
            server_info: self.info.clone(),
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(err) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, err.to_string()),
        }
    }

    fn handle_list_tools(&self, id: Option<serde_json::Value>) -> JsonRpcResponse {
        let schemas = self.registry.schemas();
        JsonRpcResponse::success(id, serde_json::json!({ "tools": schemas }))
    }

    async fn handle_call_tool(
        &self,
        id: Option<serde_json::Value>,
        params: Option<serde_json::Value>,
    ) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::error(
                id,
                error_codes::INVALID_PARAMS,
                "Missing params for tools/call",
            );
        };

        let call: CallToolParams = match serde_json::from_value(params) {
            Ok(call) => call,
            Err(err) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid tool call params: {err}"),
                );
            }
        };

        // Tool-level failures, unknown names included, come back as isError
        // content on a successful response
        let result = match self.registry.get(&call.name) {
            Some(tool) => {
                tracing::debug!(tool = %call.name, "executing tool");
                match tool.execute(call.arguments).await {
                    Ok(result) => result,
                    Err(err) => crate::protocol::CallToolResult::error(err.to_string()),
                }
            }
            None => crate::protocol::CallToolResult::error(format!("Unknown tool: {}", call.name)),
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(err) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, err.to_string()),
        }
    }

    /// Serve newline-delimited JSON-RPC on stdin/stdout until EOF.
    ///
    /// Stdout carries only protocol traffic; diagnostics go to the tracing
    /// subscriber (stderr in the shipped binary).
    pub async fn run(&self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<JsonRpcRequest>(line) {
                Ok(request) => self.handle_request(request).await,
                Err(err) => Some(JsonRpcResponse::error(
                    None,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON-RPC request: {err}"),
                )),
            };

            if let Some(response) = response {
                let json = serde_json::to_string(&response)?;
                stdout.write_all(json.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
        }

        tracing::info!("stdin closed, shutting down");
        Ok(())
    }
}
