//! Agent options handed to the backend at construction time

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::permissions::PermissionMode;
use crate::tools::Tool;

/// Model selection, either a family alias or an explicit model id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Model {
    Haiku,
    Sonnet,
    Opus,
    /// Use whatever the parent agent runs on (subagents only)
    Inherit,
    #[serde(untagged)]
    Custom(String),
}

impl Model {
    /// The short alias understood by the agent runtime
    pub fn alias(&self) -> &str {
        match self {
            Model::Haiku => "haiku",
            Model::Sonnet => "sonnet",
            Model::Opus => "opus",
            Model::Inherit => "inherit",
            Model::Custom(id) => id,
        }
    }

    /// The model id used by the Messages API
    pub fn api_id(&self) -> &str {
        match self {
            Model::Haiku => "claude-haiku-4-5",
            Model::Sonnet | Model::Inherit => "claude-sonnet-4-5",
            Model::Opus => "claude-opus-4-1",
            Model::Custom(id) => id,
        }
    }
}

impl From<&str> for Model {
    fn from(name: &str) -> Self {
        match name {
            "haiku" => Model::Haiku,
            "sonnet" => Model::Sonnet,
            "opus" => Model::Opus,
            "inherit" => Model::Inherit,
            other => Model::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alias())
    }
}

/// Where the runtime may load additional settings from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingSource {
    User,
    Project,
    Local,
}

impl SettingSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingSource::User => "user",
            SettingSource::Project => "project",
            SettingSource::Local => "local",
        }
    }
}

/// A named delegate agent the runtime may hand work to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDefinition {
    /// When the parent should delegate to this agent
    pub description: String,
    /// System prompt of the delegate
    pub prompt: String,
    /// Tool subset; `None` inherits the parent's tools
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<Model>,
}

impl AgentDefinition {
    pub fn new(description: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            prompt: prompt.into(),
            tools: None,
            model: None,
        }
    }

    pub fn with_tools(mut self, tools: impl IntoIterator<Item = Tool>) -> Self {
        self.tools = Some(tools.into_iter().collect());
        self
    }

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = Some(model);
        self
    }
}

/// Immutable configuration for one agent
///
/// Built once at startup with the `with_*` methods and then shared
/// behind an `Arc` by every session the backend opens.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentOptions {
    system_prompt: String,
    allowed_tools: Vec<Tool>,
    permission_mode: PermissionMode,
    model: Option<Model>,
    cwd: Option<PathBuf>,
    setting_sources: Vec<SettingSource>,
    agents: BTreeMap<String, AgentDefinition>,
}

impl AgentOptions {
    /// Create options with the given system prompt and runtime defaults
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            allowed_tools: Vec::new(),
            permission_mode: PermissionMode::Default,
            model: None,
            cwd: None,
            setting_sources: Vec::new(),
            agents: BTreeMap::new(),
        }
    }

    pub fn with_allowed_tools(mut self, tools: impl IntoIterator<Item = Tool>) -> Self {
        self.allowed_tools = tools.into_iter().collect();
        self
    }

    pub fn with_permission_mode(mut self, mode: PermissionMode) -> Self {
        self.permission_mode = mode;
        self
    }

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = Some(model);
        self
    }

    /// Set the sandbox directory the runtime works in
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_setting_sources(
        mut self,
        sources: impl IntoIterator<Item = SettingSource>,
    ) -> Self {
        self.setting_sources = sources.into_iter().collect();
        self
    }

    /// Register a named subagent
    pub fn with_agent(mut self, name: impl Into<String>, definition: AgentDefinition) -> Self {
        self.agents.insert(name.into(), definition);
        self
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn allowed_tools(&self) -> &[Tool] {
        &self.allowed_tools
    }

    pub fn permission_mode(&self) -> PermissionMode {
        self.permission_mode
    }

    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    pub fn setting_sources(&self) -> &[SettingSource] {
        &self.setting_sources
    }

    pub fn agents(&self) -> &BTreeMap<String, AgentDefinition> {
        &self.agents
    }

    /// Whether the runtime may use the given tool
    pub fn allows(&self, tool: &Tool) -> bool {
        self.allowed_tools.contains(tool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_keeps_values() {
        let options = AgentOptions::new("be helpful")
            .with_allowed_tools([Tool::Read, Tool::Write])
            .with_permission_mode(PermissionMode::AcceptEdits)
            .with_model(Model::Haiku)
            .with_cwd("/tmp/sandbox")
            .with_setting_sources([SettingSource::Local]);

        assert_eq!(options.system_prompt(), "be helpful");
        assert!(options.allows(&Tool::Write));
        assert!(!options.allows(&Tool::Bash));
        assert_eq!(options.permission_mode(), PermissionMode::AcceptEdits);
        assert_eq!(options.model(), Some(&Model::Haiku));
        assert_eq!(options.cwd(), Some(Path::new("/tmp/sandbox")));
        assert_eq!(options.setting_sources(), &[SettingSource::Local]);
    }

    #[test]
    fn test_agent_definition_json_shape() {
        let def = AgentDefinition::new("Explains things", "You explain things.")
            .with_tools([Tool::Read, Tool::Edit])
            .with_model(Model::Haiku);

        assert_eq!(
            serde_json::to_value(&def).unwrap(),
            json!({
                "description": "Explains things",
                "prompt": "You explain things.",
                "tools": ["Read", "Edit"],
                "model": "haiku"
            })
        );

        let bare = AgentDefinition::new("Reviews", "You review.");
        let value = serde_json::to_value(&bare).unwrap();
        assert!(value.get("tools").is_none());
        assert!(value.get("model").is_none());
    }

    #[test]
    fn test_model_names() {
        assert_eq!(Model::from("haiku"), Model::Haiku);
        assert_eq!(Model::from("claude-x"), Model::Custom("claude-x".into()));
        assert_eq!(Model::Custom("claude-x".into()).api_id(), "claude-x");
        assert_eq!(
            serde_json::to_value(Model::Custom("claude-x".into())).unwrap(),
            json!("claude-x")
        );
    }
}
