//! Events streamed back for a single turn

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Terminal marker of a turn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    /// Whether the runtime finished the turn with an error
    pub is_error: bool,
    /// Runtime-specific subtype, e.g. `success` or `error_max_turns`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    /// Final text (or error text) reported by the runtime
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_turns: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost_usd: Option<f64>,
}

impl TurnResult {
    pub fn success() -> Self {
        Self {
            subtype: Some("success".to_string()),
            ..Self::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            subtype: Some("error".to_string()),
            result: Some(message.into()),
            ..Self::default()
        }
    }

    /// Best description of what went wrong, for error results
    pub fn error_message(&self) -> String {
        self.result
            .clone()
            .or_else(|| self.subtype.clone())
            .unwrap_or_else(|| "unknown error".to_string())
    }
}

/// One event of a turn's response, in delivery order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentEvent {
    /// Textual content from the assistant
    Text { text: String },

    /// Extended-thinking content
    Thinking { text: String },

    /// The runtime invoked a tool
    ToolUse {
        id: String,
        name: String,
        input: Value,
        /// Set when a subagent, not the main agent, made the call
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent_tool_use_id: Option<String>,
    },

    /// Output of a tool invocation
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(default)]
        is_error: bool,
    },

    /// Runtime housekeeping (session init, compaction notices)
    System {
        subtype: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_id: Option<String>,
    },

    /// End of the turn
    Result(TurnResult),
}

impl AgentEvent {
    pub fn text(text: impl Into<String>) -> Self {
        AgentEvent::Text { text: text.into() }
    }

    /// The text carried by a textual-content event
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AgentEvent::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, AgentEvent::Text { .. })
    }

    /// Whether this event ends the turn
    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentEvent::Result(_))
    }
}
