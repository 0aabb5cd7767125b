//! MCP tool definitions and the tool-result content block.

use anyhow::{Context, Result, bail};
use jsonschema::Draft;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::core::taxonomy::all_labels;
use crate::core::types::PAUSE_DURATION_RANGE;

pub mod tool_names {
    pub const LOTUSWISDOM: &str = "lotuswisdom";
    pub const SUMMARY: &str = "lotuswisdom_summary";
    pub const FRAMEWORK: &str = "lotuswisdom_framework";
}

/// MCP tool definition for `tools/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// All tools exposed by the server.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            tool_names::LOTUSWISDOM,
            "Contemplative reasoning tool. Use for complex problems needing multi-perspective \
             understanding, contradictions requiring integration, or questions holding their own wisdom.\n\n\
             **Workflow:** Start with label='begin' (returns the framework), then continue with \
             contemplation labels. Do NOT output wisdom until status='WISDOM_READY', then speak \
             naturally in your own voice.\n\n\
             **Labels:** begin (entry), open/engage/express (process), \
             examine/reflect/verify/refine/complete (meta-cognitive), \
             recognize/transform/integrate/transcend/embody (non-dual), \
             upaya/expedient/direct/gradual/sudden (skillful means), meditate (pause, returns PAUSE_COMPLETE).",
            step_input_schema(),
        ),
        ToolDefinition::new(
            tool_names::SUMMARY,
            "Get a summary of the current contemplative journey",
            empty_input_schema(),
        ),
        ToolDefinition::new(
            tool_names::FRAMEWORK,
            "Learn the Lotus Wisdom framework: the domains, their spirit, and how to navigate. \
             Does not change the current journey.",
            empty_input_schema(),
        ),
    ]
}

fn step_input_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "label": {
                "type": "string",
                "description": "Current processing technique",
                "enum": all_labels()
            },
            "content": {
                "type": "string",
                "description": "Content of the current processing step"
            },
            "stepNumber": {
                "type": "integer",
                "description": "Current step number",
                "minimum": 1
            },
            "totalSteps": {
                "type": "integer",
                "description": "Estimated total steps needed",
                "minimum": 1
            },
            "nextStepNeeded": {
                "type": "boolean",
                "description": "Whether another step is needed"
            },
            "isPause": {
                "type": "boolean",
                "description": "Whether this step is a meditative pause"
            },
            "pauseDuration": {
                "type": "integer",
                "description": "Duration for meditation in seconds",
                "minimum": PAUSE_DURATION_RANGE.start(),
                "maximum": PAUSE_DURATION_RANGE.end()
            }
        },
        "required": ["label", "content", "stepNumber", "totalSteps", "nextStepNeeded"]
    })
}

fn empty_input_schema() -> Value {
    json!({
        "type": "object",
        "properties": {},
        "required": []
    })
}

/// Compile every tool input schema as JSON Schema (Draft 2020-12).
pub fn check_tool_schemas() -> Result<()> {
    let mut failures = Vec::new();
    for tool in tool_definitions() {
        if let Err(err) = jsonschema::options()
            .with_draft(Draft::Draft202012)
            .build(&tool.input_schema)
        {
            failures.push(format!("{}: {}", tool.name, err));
        }
    }
    if !failures.is_empty() {
        bail!("invalid tool schemas:\n- {}", failures.join("\n- "));
    }
    Ok(())
}

/// Validate `arguments` against the schema of tool `name`.
///
/// Returns the schema violations (empty on success). Step validation proper
/// happens in the core; this is a diagnostic for `lotus check`.
pub fn schema_violations(name: &str, arguments: &Value) -> Result<Vec<String>> {
    let tool = tool_definitions()
        .into_iter()
        .find(|tool| tool.name == name)
        .with_context(|| format!("unknown tool {name}"))?;
    let compiled = jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(&tool.input_schema)
        .with_context(|| format!("compile schema for {name}"))?;
    Ok(compiled
        .iter_errors(arguments)
        .map(|err| err.to_string())
        .collect())
}

/// MCP text content block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

/// MCP `tools/call` result: one text block plus the error flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<TextContent>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolResult {
    /// Pretty-printed JSON payload.
    pub fn json<T: Serialize>(payload: &T) -> Self {
        let text = serde_json::to_string_pretty(payload).unwrap_or_else(|_| "{}".to_string());
        Self::text(text, false)
    }

    /// Structured failure payload: `{"error": message, "status": "failed"}`.
    pub fn failure(message: impl Into<String>) -> Self {
        let mut result = Self::json(&json!({
            "error": message.into(),
            "status": "failed",
        }));
        result.is_error = true;
        result
    }

    /// Plain-text error (unknown tool).
    pub fn plain_error(message: impl Into<String>) -> Self {
        Self::text(message.into(), true)
    }

    fn text(text: String, is_error: bool) -> Self {
        Self {
            content: vec![TextContent {
                kind: "text".to_string(),
                text,
            }],
            is_error,
        }
    }

    /// The single text block.
    pub fn body(&self) -> &str {
        self.content
            .first()
            .map(|block| block.text.as_str())
            .unwrap_or_default()
    }

    /// Parse the text block back into JSON.
    pub fn payload(&self) -> Result<Value> {
        serde_json::from_str(self.body()).context("parse tool result text as json")
    }
}
