//! Configuration for the agent
//!
//! `AgentOptions` is the immutable per-agent record handed to a backend.
//! `Settings` holds the process-level knobs read from the environment.

mod options;
mod settings;

pub use options::{AgentDefinition, AgentOptions, Model, SettingSource};
pub use settings::{BackendKind, Settings, API_KEY_VAR, DEFAULT_WORKING_DIR};
