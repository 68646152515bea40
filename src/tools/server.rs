//! Tool server: exposes the router as the single `search` tool

use super::rpc::{RpcRequest, RpcResponse};
use crate::router::FallbackRouter;
use crate::results::SearchOutput;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Protocol revision announced on `initialize`
pub const PROTOCOL_VERSION: &str = "2024-11-05";
/// Name the tool is published under
pub const SEARCH_TOOL: &str = "search";
/// Server name announced on `initialize`
pub const SERVER_NAME: &str = "internet_search";

/// Transport-independent JSON-RPC handler for the search tool
#[derive(Clone)]
pub struct ToolServer {
    router: Arc<FallbackRouter>,
}

impl ToolServer {
    pub fn new(router: Arc<FallbackRouter>) -> Self {
        Self { router }
    }

    /// Tool descriptors returned by `tools/list`
    pub fn tools() -> Value {
        json!([{
            "name": SEARCH_TOOL,
            "description": "Search the internet for general queries",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query"
                    }
                },
                "required": ["query"]
            }
        }])
    }

    /// Handle one raw frame. Returns the serialized response, if any.
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        let response = match serde_json::from_str::<RpcRequest>(line) {
            Ok(request) => self.handle(request).await?,
            Err(e) => {
                error!(error = %e, "Unparsable JSON-RPC frame");
                RpcResponse::parse_error(format!("Invalid JSON-RPC message: {e}"))
            }
        };

        match serde_json::to_string(&response) {
            Ok(text) => Some(text),
            Err(e) => {
                error!(error = %e, "Failed to serialize JSON-RPC response");
                None
            }
        }
    }

    /// Handle one request. Notifications produce no response.
    pub async fn handle(&self, request: RpcRequest) -> Option<RpcResponse> {
        debug!(method = %request.method, "Received JSON-RPC request");

        if request.jsonrpc != "2.0" {
            return Some(RpcResponse::invalid_request(
                request.id,
                "Unsupported jsonrpc version (expected 2.0)",
            ));
        }

        if request.is_notification() {
            debug!(method = %request.method, "Ignoring notification");
            return None;
        }

        let id = request.id.clone();
        let response = match request.method.as_str() {
            "initialize" => RpcResponse::success(
                id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "serverInfo": {
                        "name": SERVER_NAME,
                        "version": crate::VERSION,
                    },
                    "capabilities": { "tools": {} },
                }),
            ),
            "ping" => RpcResponse::success(id, json!({})),
            "tools/list" => RpcResponse::success(id, json!({ "tools": Self::tools() })),
            "tools/call" => self.handle_tool_call(id, request.params.as_ref()).await,
            other => {
                error!(method = other, "Unknown JSON-RPC method");
                RpcResponse::method_not_found(id, other)
            }
        };

        Some(response)
    }

    async fn handle_tool_call(&self, id: Option<Value>, params: Option<&Value>) -> RpcResponse {
        let Some(Value::Object(params)) = params else {
            return RpcResponse::invalid_params(id, "params must be an object with name and arguments");
        };

        match params.get("name").and_then(Value::as_str) {
            Some(SEARCH_TOOL) => {}
            Some(other) => {
                return RpcResponse::invalid_params(id, format!("Unknown tool: {other}"));
            }
            None => return RpcResponse::invalid_params(id, "params.name must be a string"),
        }

        // Blank queries are passed through as-is
        let Some(query) = params
            .get("arguments")
            .and_then(|args| args.get("query"))
            .and_then(Value::as_str)
        else {
            return RpcResponse::invalid_params(id, "arguments.query must be a string");
        };

        info!(tool = SEARCH_TOOL, "Tool call");
        let output = self.router.search(query).await;

        RpcResponse::success(id, tool_result(output))
    }
}

/// `tools/call` result: one text item for a string answer, one per element
/// for a list answer. The failure sentinel is a normal text result.
fn tool_result(output: SearchOutput) -> Value {
    let content: Vec<Value> = output
        .into_texts()
        .into_iter()
        .map(|text| json!({ "type": "text", "text": text }))
        .collect();

    json!({ "content": content, "isError": false })
}
