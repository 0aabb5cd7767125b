//! One MCP session: JSON-RPC dispatch over a single [`Journey`].
//!
//! Transports own one `McpSession` per logical connection and feed it
//! requests one at a time.

use anyhow::Result;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::core::framework::framework_payload;
use crate::core::journey::{Journey, JourneyOptions};
use crate::io::config::LotusConfig;
use crate::io::render::StepRenderer;
use crate::protocol::{
    JsonRpcId, JsonRpcRequest, JsonRpcResponse, error_codes, methods, negotiate_protocol_version,
};
use crate::tools::{ToolResult, tool_definitions, tool_names};

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "lotus-wisdom";

pub struct McpSession {
    journey: Journey,
    renderer: Option<StepRenderer>,
}

impl McpSession {
    pub fn new(options: JourneyOptions) -> Self {
        Self {
            journey: Journey::new(options),
            renderer: None,
        }
    }

    /// Session configured from `config`; echo on when `echo_steps` is set.
    pub fn from_config(config: &LotusConfig) -> Result<Self> {
        let session = Self::new(config.journey_options());
        if config.echo_steps {
            return Ok(session.with_renderer(StepRenderer::new()?));
        }
        Ok(session)
    }

    /// Echo every accepted step to stderr through `renderer`.
    pub fn with_renderer(mut self, renderer: StepRenderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn journey(&self) -> &Journey {
        &self.journey
    }

    /// Submit a step. Validation failures become a flagged tool result.
    pub fn submit_step(&mut self, arguments: &Value) -> ToolResult {
        match self.journey.submit(arguments) {
            Ok(submission) => {
                debug!(
                    label = %submission.record.label,
                    category = %submission.record.category,
                    step = submission.record.step_number,
                    total = submission.record.total_steps,
                    reset = submission.reset,
                    length = self.journey.len(),
                    status = submission.response.status(),
                    "step accepted"
                );
                if let Some(renderer) = &self.renderer {
                    match renderer.render(&submission.record) {
                        Ok(banner) => eprintln!("{banner}"),
                        Err(err) => warn!(error = %err, "step banner render failed"),
                    }
                }
                ToolResult::json(&submission.response)
            }
            Err(err) => {
                debug!(error = %err, "step rejected");
                ToolResult::failure(err.to_string())
            }
        }
    }

    pub fn summary(&self) -> ToolResult {
        ToolResult::json(&self.journey.summary())
    }

    pub fn framework(&self) -> ToolResult {
        ToolResult::json(&framework_payload())
    }

    /// Route a `tools/call` by name.
    pub fn call_tool(&mut self, name: &str, arguments: &Value) -> ToolResult {
        match name {
            tool_names::LOTUSWISDOM => self.submit_step(arguments),
            tool_names::SUMMARY => self.summary(),
            tool_names::FRAMEWORK => self.framework(),
            _ => ToolResult::plain_error(format!("Unknown tool: {name}")),
        }
    }

    /// Handle one raw JSON-RPC line. Returns `None` for notifications.
    pub fn handle_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "failed to parse request");
                return Some(JsonRpcResponse::error(
                    None,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {err}"),
                ));
            }
        };
        let id = readable_id(&value);
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle(request),
            Err(err) => {
                warn!(error = %err, "malformed request");
                Some(JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_REQUEST,
                    format!("Invalid Request: {err}"),
                ))
            }
        }
    }

    /// Dispatch a parsed request. Returns `None` for notifications.
    pub fn handle(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id,
                error_codes::INVALID_REQUEST,
                "Invalid JSON-RPC version",
            ));
        }

        if request.is_notification() {
            if request.method == methods::INITIALIZED {
                debug!("client finished initialization");
            } else {
                debug!(method = %request.method, "notification received");
            }
            return None;
        }

        debug!(method = %request.method, "dispatching");
        let id = request.id;
        let response = match request.method.as_str() {
            methods::INITIALIZE => {
                let requested = request
                    .params
                    .as_ref()
                    .and_then(|params| params.get("protocolVersion"))
                    .and_then(Value::as_str);
                let version = negotiate_protocol_version(requested);
                info!(protocol_version = version, "session initialized");
                JsonRpcResponse::success(
                    id,
                    json!({
                        "protocolVersion": version,
                        "capabilities": { "tools": {} },
                        "serverInfo": {
                            "name": SERVER_NAME,
                            "version": env!("CARGO_PKG_VERSION")
                        }
                    }),
                )
            }
            methods::PING | methods::SHUTDOWN => JsonRpcResponse::success(id, json!({})),
            methods::TOOLS_LIST => {
                JsonRpcResponse::success(id, json!({ "tools": tool_definitions() }))
            }
            methods::TOOLS_CALL => self.handle_tools_call(id, request.params),
            other => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            ),
        };
        Some(response)
    }

    fn handle_tools_call(
        &mut self,
        id: Option<JsonRpcId>,
        params: Option<Value>,
    ) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::error(
                id,
                error_codes::INVALID_PARAMS,
                "Missing params for tools/call",
            );
        };
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return JsonRpcResponse::error(
                id,
                error_codes::INVALID_PARAMS,
                "Missing 'name' parameter in tools/call",
            );
        };
        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        let result = self.call_tool(name, &arguments);
        match serde_json::to_value(&result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(err) => JsonRpcResponse::error(
                id,
                error_codes::INTERNAL_ERROR,
                format!("serialize tool result: {err}"),
            ),
        }
    }
}

/// The request id, when it is a string or an integer.
fn readable_id(value: &Value) -> Option<JsonRpcId> {
    match value.get("id")? {
        Value::String(id) => Some(JsonRpcId::String(id.clone())),
        Value::Number(id) => id.as_i64().map(JsonRpcId::Number),
        _ => None,
    }
}
