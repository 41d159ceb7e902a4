//! Translate stream-json lines into agent events

use serde_json::Value;

use super::types::{content_to_string, StreamLine, WireBlock, WireContent};
use crate::backend::{AgentEvent, TurnResult};

/// Stateful parser for one runtime session
#[derive(Debug, Default)]
pub struct StreamParser {
    session_id: Option<String>,
}

impl StreamParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// The runtime's session id, once a line carried it
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Parse one complete output line into zero or more events
    ///
    /// Blank lines, malformed JSON and line types this layer does not
    /// render produce no events.
    pub fn parse_line(&mut self, line: &str) -> Vec<AgentEvent> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        let parsed: StreamLine = match serde_json::from_str(trimmed) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Skipping malformed runtime line: {}", e);
                tracing::debug!("Malformed line: {}", trimmed);
                return Vec::new();
            }
        };

        if let Some(ref sid) = parsed.session_id {
            if self.session_id.as_deref() != Some(sid.as_str()) {
                tracing::info!("Runtime session id: {}", sid);
                self.session_id = Some(sid.clone());
            }
        }

        self.translate(parsed)
    }

    fn translate(&self, line: StreamLine) -> Vec<AgentEvent> {
        match line.line_type.as_str() {
            "system" => vec![AgentEvent::System {
                subtype: line.subtype.unwrap_or_default(),
                session_id: line.session_id,
            }],

            "assistant" => {
                let parent = line.parent_tool_use_id;
                match line.message.map(|m| m.content) {
                    Some(WireContent::Text(text)) if !text.is_empty() => {
                        vec![AgentEvent::Text { text }]
                    }
                    Some(WireContent::Blocks(blocks)) => blocks
                        .into_iter()
                        .filter_map(|block| assistant_block(block, parent.clone()))
                        .collect(),
                    _ => Vec::new(),
                }
            }

            // Only tool results are interesting; the prompt echo is not
            "user" => match line.message.map(|m| m.content) {
                Some(WireContent::Blocks(blocks)) => {
                    blocks.into_iter().filter_map(tool_result_block).collect()
                }
                _ => Vec::new(),
            },

            "result" => vec![AgentEvent::Result(TurnResult {
                is_error: line.is_error.unwrap_or(false),
                subtype: line.subtype,
                result: line.result,
                session_id: line.session_id.or_else(|| self.session_id.clone()),
                duration_ms: line.duration_ms,
                num_turns: line.num_turns,
                total_cost_usd: line.total_cost_usd,
            })],

            other => {
                tracing::debug!("Ignoring runtime line of type '{}'", other);
                Vec::new()
            }
        }
    }
}

fn assistant_block(block: WireBlock, parent_tool_use_id: Option<String>) -> Option<AgentEvent> {
    match block.block_type.as_str() {
        "text" => block
            .text
            .filter(|text| !text.is_empty())
            .map(|text| AgentEvent::Text { text }),
        "thinking" => block.thinking.map(|text| AgentEvent::Thinking { text }),
        "tool_use" => Some(AgentEvent::ToolUse {
            id: block.id.unwrap_or_default(),
            name: block.name.unwrap_or_else(|| "Unknown".to_string()),
            input: block.input.unwrap_or(Value::Null),
            parent_tool_use_id,
        }),
        _ => None,
    }
}

fn tool_result_block(block: WireBlock) -> Option<AgentEvent> {
    if block.block_type != "tool_result" {
        return None;
    }
    Some(AgentEvent::ToolResult {
        tool_use_id: block.tool_use_id.unwrap_or_default(),
        content: block.content.as_ref().map(content_to_string).unwrap_or_default(),
        is_error: block.is_error.unwrap_or(false),
    })
}
