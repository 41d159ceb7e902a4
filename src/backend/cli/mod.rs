//! Agent runtime driven as a child process
//!
//! Each session is one runtime process started in the agent's sandbox
//! directory. Prompts are written to its stdin and every message comes back
//! as a stream-json line on stdout, which [`StreamParser`] turns into
//! [`AgentEvent`](crate::backend::AgentEvent)s.

mod parser;
mod session;
pub mod spawn;
mod types;

use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;

use crate::backend::{Backend, Session};
use crate::config::{AgentOptions, API_KEY_VAR};
use crate::core::{AgentError, AgentResult};

pub use parser::StreamParser;
pub use session::CliSession;

/// Backend that spawns the agent runtime binary
pub struct ClaudeCliBackend {
    cli_path: String,
    api_key: String,
    options: Arc<AgentOptions>,
}

impl ClaudeCliBackend {
    pub fn new(cli_path: impl Into<String>, api_key: impl Into<String>, options: Arc<AgentOptions>) -> Self {
        Self {
            cli_path: cli_path.into(),
            api_key: api_key.into(),
            options,
        }
    }
}

#[async_trait]
impl Backend for ClaudeCliBackend {
    async fn connect(&self) -> AgentResult<Box<dyn Session>> {
        if let Some(cwd) = self.options.cwd() {
            tokio::fs::create_dir_all(cwd).await.map_err(|e| {
                AgentError::Connect(format!(
                    "cannot create working directory {}: {}",
                    cwd.display(),
                    e
                ))
            })?;
        }

        log_tool_policy(&self.options);
        let args = spawn::build_args(&self.options)?;
        tracing::info!("Starting runtime: {}", self.cli_path);
        tracing::debug!("Runtime args: {:?}", args);

        let mut cmd = Command::new(&self.cli_path);
        cmd.args(&args)
            .env(API_KEY_VAR, &self.api_key)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(cwd) = self.options.cwd() {
            cmd.current_dir(cwd);
        }

        let child = cmd.spawn().map_err(|e| {
            tracing::error!("Failed to start runtime '{}': {}", self.cli_path, e);
            AgentError::Connect(format!("failed to start '{}': {}", self.cli_path, e))
        })?;

        Ok(Box::new(CliSession::new(child)?))
    }

    fn name(&self) -> &str {
        "cli"
    }
}

/// Report which side effects the runtime may perform without asking
fn log_tool_policy(options: &AgentOptions) {
    let preapproved: Vec<&str> = options
        .allowed_tools()
        .iter()
        .filter(|tool| tool.has_side_effects())
        .map(|tool| tool.name())
        .collect();
    if !preapproved.is_empty() {
        tracing::info!("Pre-approved tools with side effects: {}", preapproved.join(", "));
    }
    if options.permission_mode().auto_proceeds() {
        tracing::warn!(
            "Permission mode '{}' lets the runtime change files without asking",
            options.permission_mode()
        );
    }
}
