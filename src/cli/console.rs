use colored::*;
use serde_json::Value;
use std::io::{self, BufRead, Write};

use crate::backend::AgentEvent;

/// Longest tool input shown inline before it is cut off
const TOOL_INPUT_PREVIEW: usize = 80;

/// Console handles all terminal I/O with colored formatting
pub struct Console {
    user_color: Color,
    agent_color: Color,
}

impl Console {
    /// Create a new Console with default colors
    pub fn new() -> Self {
        Self {
            user_color: Color::Green,
            agent_color: Color::Blue,
        }
    }

    /// Print the agent prefix (without newline)
    pub fn print_agent_prefix(&self) {
        print!("{} ", "Agent:".color(self.agent_color).bold());
        flush_stdout();
    }

    /// Render one streamed event of a turn
    pub fn render_event(&self, event: &AgentEvent) {
        match event {
            AgentEvent::Text { text } => {
                print!("{}", text.color(self.agent_color));
                flush_stdout();
            }
            AgentEvent::Thinking { text } => {
                println!("{}", text.dimmed().italic());
            }
            AgentEvent::ToolUse { name, input, .. } => {
                println!();
                println!(
                    "{} {}",
                    format!("[{}]", name).yellow().bold(),
                    tool_input_preview(input).bright_black()
                );
            }
            AgentEvent::ToolResult {
                content, is_error, ..
            } => {
                let first = content.lines().next().unwrap_or("");
                if *is_error {
                    println!("  {} {}", "↳".red(), first.red());
                } else {
                    println!("  {} {}", "↳".bright_black(), first.bright_black());
                }
            }
            AgentEvent::System { .. } => {}
            AgentEvent::Result(result) => {
                println!();
                if result.is_error {
                    self.print_error(&result.error_message());
                } else {
                    let mut stats = Vec::new();
                    if let Some(ms) = result.duration_ms {
                        stats.push(format!("{:.1}s", ms as f64 / 1000.0));
                    }
                    if let Some(turns) = result.num_turns {
                        stats.push(format!("{} turns", turns));
                    }
                    if let Some(cost) = result.total_cost_usd {
                        stats.push(format!("${:.4}", cost));
                    }
                    if !stats.is_empty() {
                        println!("{}", format!("({})", stats.join(", ")).dimmed());
                    }
                }
            }
        }
    }

    /// Print a newline
    pub fn println(&self) {
        println!();
    }

    /// Print a system message (errors, info, etc.)
    pub fn print_system(&self, message: &str) {
        println!("{} {}", "System:".yellow().bold(), message.yellow());
    }

    /// Print an error message
    pub fn print_error(&self, error: &str) {
        eprintln!("{} {}", "Error:".red().bold(), error);
    }

    /// Read a line of input from the user
    ///
    /// Returns `None` once stdin is closed.
    pub fn read_input(&self, turn: usize) -> io::Result<Option<String>> {
        print!(
            "{} {}: ",
            "You".color(self.user_color).bold(),
            format!("(Turn {})", turn).dimmed()
        );
        io::stdout().flush()?;

        let mut input = String::new();
        let read = io::stdin().lock().read_line(&mut input)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(input.trim_end_matches(['\n', '\r']).to_string()))
    }

    /// Print a welcome banner
    pub fn print_banner(&self) {
        println!("{}", "=".repeat(60).cyan());
        println!("{}", "  Process Agent".cyan().bold());
        println!("{}", "=".repeat(60).cyan());
        println!();
        println!("Type your questions or requests. Commands:");
        println!("  - 'exit' or 'quit' to end the session");
        println!("  - 'new' to start a new conversation");
        println!();
    }

    /// Print a separator line
    pub fn print_separator(&self) {
        println!("{}", "-".repeat(60).bright_black());
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

fn flush_stdout() {
    // A failed flush only delays output
    let _ = io::stdout().flush();
}

/// One-line summary of a tool call's input
fn tool_input_preview(input: &Value) -> String {
    let summary = match input {
        Value::Object(map) => ["command", "file_path", "pattern", "path", "url", "query"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| input.to_string()),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    truncate(&summary, TOOL_INPUT_PREVIEW)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{}…", cut)
    }
}
