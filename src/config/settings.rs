//! Process-level settings read from the environment

use std::path::PathBuf;
use std::time::Duration;

use crate::config::Model;
use crate::core::{AgentError, AgentResult};

/// Credential required by every backend
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// Sandbox folder next to the agent, used when no override is set
pub const DEFAULT_WORKING_DIR: &str = "working-dir";

/// Which transport drives the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// The agent runtime as a child process speaking stream-json
    #[default]
    Cli,
    /// The Messages API over HTTP, chat only
    Api,
}

/// Settings resolved once at process start
#[derive(Clone)]
pub struct Settings {
    pub api_key: String,
    pub backend: BackendKind,
    pub cli_path: String,
    pub working_dir: PathBuf,
    pub model: Option<Model>,
    pub timeout: Option<Duration>,
    pub api_base_url: Option<String>,
    /// Reply length limit for the API backend
    pub max_tokens: Option<u32>,
}

// The API key stays out of logs and panics
impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("backend", &self.backend)
            .field("cli_path", &self.cli_path)
            .field("working_dir", &self.working_dir)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("api_base_url", &self.api_base_url)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl Settings {
    /// Load settings from the process environment
    ///
    /// A `.env` file in the current directory is loaded first if present.
    /// Reads:
    /// - `ANTHROPIC_API_KEY` (required)
    /// - `PROCESS_AGENT_BACKEND` (`cli` or `api`, defaults to `cli`)
    /// - `CLAUDE_CLI_PATH` (defaults to `claude`)
    /// - `PROCESS_AGENT_WORKING_DIR` (defaults to `./working-dir`)
    /// - `PROCESS_AGENT_MODEL` (optional model override)
    /// - `PROCESS_AGENT_TIMEOUT_SECS` (optional query timeout)
    /// - `ANTHROPIC_BASE_URL` (optional, API backend only)
    /// - `PROCESS_AGENT_MAX_TOKENS` (optional, API backend only)
    pub fn from_env() -> AgentResult<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::info!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> AgentResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = get(API_KEY_VAR).ok_or(AgentError::MissingCredential(API_KEY_VAR))?;

        let backend = match get("PROCESS_AGENT_BACKEND").as_deref() {
            None | Some("cli") => BackendKind::Cli,
            Some("api") => BackendKind::Api,
            Some(other) => {
                return Err(AgentError::Config(format!(
                    "PROCESS_AGENT_BACKEND must be 'cli' or 'api', got '{}'",
                    other
                )))
            }
        };

        let cli_path = get("CLAUDE_CLI_PATH").unwrap_or_else(|| "claude".to_string());

        let working_dir = get("PROCESS_AGENT_WORKING_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WORKING_DIR));

        let model = get("PROCESS_AGENT_MODEL").map(|name| Model::from(name.as_str()));

        let timeout = match get("PROCESS_AGENT_TIMEOUT_SECS") {
            None => None,
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    AgentError::Config(format!(
                        "PROCESS_AGENT_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                        raw
                    ))
                })?;
                if secs == 0 {
                    return Err(AgentError::Config(
                        "PROCESS_AGENT_TIMEOUT_SECS must be greater than zero".to_string(),
                    ));
                }
                Some(Duration::from_secs(secs))
            }
        };

        let api_base_url = get("ANTHROPIC_BASE_URL");

        let max_tokens = match get("PROCESS_AGENT_MAX_TOKENS") {
            None => None,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    return Err(AgentError::Config(format!(
                        "PROCESS_AGENT_MAX_TOKENS must be a positive whole number, got '{}'",
                        raw
                    )))
                }
            },
        };

        tracing::info!("Backend: {:?}", backend);
        tracing::info!("Working directory: {}", working_dir.display());
        if let Some(ref model) = model {
            tracing::info!("Model override: {}", model);
        }

        Ok(Self {
            api_key,
            backend,
            cli_path,
            working_dir,
            model,
            timeout,
            api_base_url,
            max_tokens,
        })
    }

    /// The sandbox directory as an absolute path
    pub fn absolute_working_dir(&self) -> AgentResult<PathBuf> {
        if self.working_dir.is_absolute() {
            Ok(self.working_dir.clone())
        } else {
            Ok(std::env::current_dir()?.join(&self.working_dir))
        }
    }
}
