//! Wire types for the runtime's stream-json protocol
//!
//! Every line on the runtime's stdout is one JSON object. The `type` field
//! selects which of the optional fields are populated:
//!
//! ```json
//! {"type":"system","subtype":"init","session_id":"sess-1"}
//! {"type":"assistant","message":{"role":"assistant","content":[{"type":"text","text":"Hi"}]}}
//! {"type":"user","message":{"role":"user","content":[{"type":"tool_result","tool_use_id":"t1","content":"ok"}]}}
//! {"type":"result","subtype":"success","is_error":false,"result":"Hi","session_id":"sess-1"}
//! ```
//!
//! Turns are submitted by writing one `user` line to stdin.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One line of runtime output
#[derive(Debug, Clone, Deserialize)]
pub struct StreamLine {
    #[serde(rename = "type")]
    pub line_type: String,

    #[serde(default)]
    pub subtype: Option<String>,

    #[serde(default)]
    pub session_id: Option<String>,

    /// Id of the Task tool call when a subagent produced this line
    #[serde(default)]
    pub parent_tool_use_id: Option<String>,

    #[serde(default)]
    pub message: Option<WireMessage>,

    // Fields of "result" lines
    #[serde(default)]
    pub is_error: Option<bool>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub num_turns: Option<u32>,
    #[serde(default)]
    pub total_cost_usd: Option<f64>,
}

/// Message payload of `assistant` and `user` lines
#[derive(Debug, Clone, Deserialize)]
pub struct WireMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: WireContent,
}

/// Message content: a plain string or a list of blocks
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireContent {
    Text(String),
    Blocks(Vec<WireBlock>),
}

impl Default for WireContent {
    fn default() -> Self {
        WireContent::Blocks(Vec::new())
    }
}

/// A content block; which fields are set depends on `block_type`
#[derive(Debug, Clone, Deserialize)]
pub struct WireBlock {
    /// "text", "thinking", "tool_use" or "tool_result"
    #[serde(rename = "type")]
    pub block_type: String,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub thinking: Option<String>,

    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub input: Option<Value>,

    #[serde(default)]
    pub tool_use_id: Option<String>,

    /// Tool output, either a string or a list of text blocks
    #[serde(default)]
    pub content: Option<Value>,

    #[serde(default)]
    pub is_error: Option<bool>,
}

/// A user turn written to the runtime's stdin
#[derive(Debug, Serialize)]
pub struct UserLine<'a> {
    #[serde(rename = "type")]
    pub line_type: &'static str,
    pub message: UserMessage<'a>,
    pub parent_tool_use_id: Option<&'a str>,
    pub session_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct UserMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> UserLine<'a> {
    pub fn new(prompt: &'a str, session_id: &'a str) -> Self {
        Self {
            line_type: "user",
            message: UserMessage {
                role: "user",
                content: prompt,
            },
            parent_tool_use_id: None,
            session_id,
        }
    }
}

/// Flatten tool output into display text
pub fn content_to_string(content: &Value) -> String {
    match content {
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
