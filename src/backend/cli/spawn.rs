//! Command line for the agent runtime process

use crate::config::AgentOptions;
use crate::core::{AgentError, AgentResult};

/// Build the runtime arguments for the given options
///
/// The runtime is driven in streaming mode: prompts go in as stream-json
/// on stdin and every message comes back as one JSON line on stdout.
pub fn build_args(options: &AgentOptions) -> AgentResult<Vec<String>> {
    let mut args = vec![
        "--output-format".to_string(),
        "stream-json".to_string(),
        "--input-format".to_string(),
        "stream-json".to_string(),
        "--verbose".to_string(),
    ];

    if !options.system_prompt().is_empty() {
        args.push("--system-prompt".to_string());
        args.push(options.system_prompt().to_string());
    }

    if !options.allowed_tools().is_empty() {
        let tools: Vec<&str> = options.allowed_tools().iter().map(|t| t.name()).collect();
        args.push("--allowedTools".to_string());
        args.push(tools.join(","));
    }

    args.push("--permission-mode".to_string());
    args.push(options.permission_mode().to_string());

    if let Some(model) = options.model() {
        args.push("--model".to_string());
        args.push(model.alias().to_string());
    }

    // An empty list tells the runtime to load no settings files at all
    let sources: Vec<&str> = options.setting_sources().iter().map(|s| s.as_str()).collect();
    args.push("--setting-sources".to_string());
    args.push(sources.join(","));

    if !options.agents().is_empty() {
        let agents = serde_json::to_string(options.agents())
            .map_err(|e| AgentError::Config(format!("cannot encode subagents: {}", e)))?;
        args.push("--agents".to_string());
        args.push(agents);
    }

    Ok(args)
}
