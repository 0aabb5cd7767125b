//! Test-only helpers for constructing step input and records.

use serde_json::{Value, json};

use crate::core::taxonomy::category_of;
use crate::core::types::StepRecord;

/// Raw step input as a client would send it.
pub fn step_json(label: &str, step_number: u32, total_steps: u32, next_step_needed: bool) -> Value {
    json!({
        "label": label,
        "content": format!("{} content", label),
        "stepNumber": step_number,
        "totalSteps": total_steps,
        "nextStepNeeded": next_step_needed,
    })
}

/// A validated record with deterministic defaults (`next_step_needed = true`).
pub fn record(label: &str, step_number: u32, total_steps: u32) -> StepRecord {
    StepRecord {
        label: label.to_string(),
        content: format!("{} content", label),
        step_number,
        total_steps,
        next_step_needed: true,
        is_pause: None,
        pause_duration: None,
        category: category_of(label),
    }
}

/// JSON-RPC `tools/call` request line for the stdio transport.
pub fn tool_call_line(id: i64, name: &str, arguments: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments },
    })
    .to_string()
}
