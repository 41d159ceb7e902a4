//! Tool name definition

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A named runtime tool
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tool {
    Read,
    Write,
    Edit,
    Glob,
    Grep,
    Bash,
    Skill,
    WebFetch,
    WebSearch,
    /// Delegation to a subagent
    Task,
    TodoWrite,
    NotebookEdit,
    /// Any other runtime tool, e.g. `mcp__server__tool`
    Custom(String),
}

impl Tool {
    /// The name the runtime uses for this tool
    pub fn name(&self) -> &str {
        match self {
            Tool::Read => "Read",
            Tool::Write => "Write",
            Tool::Edit => "Edit",
            Tool::Glob => "Glob",
            Tool::Grep => "Grep",
            Tool::Bash => "Bash",
            Tool::Skill => "Skill",
            Tool::WebFetch => "WebFetch",
            Tool::WebSearch => "WebSearch",
            Tool::Task => "Task",
            Tool::TodoWrite => "TodoWrite",
            Tool::NotebookEdit => "NotebookEdit",
            Tool::Custom(name) => name,
        }
    }

    /// Whether invoking this tool can change files or run commands
    pub fn has_side_effects(&self) -> bool {
        matches!(
            self,
            Tool::Write | Tool::Edit | Tool::Bash | Tool::NotebookEdit
        )
    }
}

impl From<&str> for Tool {
    fn from(name: &str) -> Self {
        match name {
            "Read" => Tool::Read,
            "Write" => Tool::Write,
            "Edit" => Tool::Edit,
            "Glob" => Tool::Glob,
            "Grep" => Tool::Grep,
            "Bash" => Tool::Bash,
            "Skill" => Tool::Skill,
            "WebFetch" => Tool::WebFetch,
            "WebSearch" => Tool::WebSearch,
            "Task" => Tool::Task,
            "TodoWrite" => Tool::TodoWrite,
            "NotebookEdit" => Tool::NotebookEdit,
            other => Tool::Custom(other.to_string()),
        }
    }
}

impl FromStr for Tool {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Tool::from(s))
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Tool {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Tool {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Tool::from(name.as_str()))
    }
}
