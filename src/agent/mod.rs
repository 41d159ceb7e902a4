//! The process agent
//!
//! Static configuration (system prompt, tools, subagents) plus the two
//! ways of talking to it: the interactive [`Agent`] loop and the
//! single-shot [`QueryRunner`] used by evaluation code.

pub mod agent_loop;
pub mod query;
pub mod subagents;
pub mod system_prompt;

pub use agent_loop::{parse_input, Agent, Command, DriverState, LoopControl};
pub use query::{query_agent, QueryOutput, QueryRunner};
pub use system_prompt::{default_system_prompt, SYSTEM_PROMPT};

use crate::config::{AgentOptions, Model, SettingSource, Settings};
use crate::core::AgentResult;
use crate::permissions::PermissionMode;
use crate::tools::Tool;

/// Tools the runtime may use without asking
pub const ALLOWED_TOOLS: [Tool; 7] = [
    Tool::Read,
    Tool::Grep,
    Tool::Glob,
    Tool::Bash,
    Tool::Write,
    Tool::Edit,
    Tool::Skill,
];

/// Build the process agent's options
///
/// The model defaults to haiku; the sandbox is the settings' working
/// directory resolved to an absolute path.
pub fn process_agent_options(settings: &Settings) -> AgentResult<AgentOptions> {
    let cwd = settings.absolute_working_dir()?;
    let model = settings.model.clone().unwrap_or(Model::Haiku);

    let options = subagents::subagents().into_iter().fold(
        AgentOptions::new(SYSTEM_PROMPT)
            .with_allowed_tools(ALLOWED_TOOLS)
            .with_permission_mode(PermissionMode::Default)
            .with_model(model)
            .with_cwd(cwd)
            .with_setting_sources([SettingSource::Local]),
        |options, (name, definition)| options.with_agent(name, definition),
    );

    tracing::debug!("Process agent options: {:?}", options);
    Ok(options)
}
