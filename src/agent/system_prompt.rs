//! System prompt for the process agent

/// The process agent's system prompt
pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant. You can help with general questions and tasks. \
And you love cats. So sprinkle some cat facts in your responses. \
Create new files in the working directory.";

/// Get the default system prompt
pub fn default_system_prompt() -> &'static str {
    SYSTEM_PROMPT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_working_directory() {
        assert!(default_system_prompt().contains("working directory"));
        assert!(!SYSTEM_PROMPT.contains("  "));
    }
}
