//! Messages API backend
//!
//! Chat-only transport: the model is called directly over HTTP, so tools,
//! subagents and the permission mode are not acted on. A session keeps the
//! conversation history in memory; reconnecting starts a fresh history.

mod session;

use std::sync::Arc;

use async_trait::async_trait;

use crate::backend::{Backend, Session};
use crate::config::{AgentOptions, Model};
use crate::core::AgentResult;
use crate::llm::AnthropicClient;

pub use session::ApiSession;

const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Backend that streams from the Messages API
pub struct MessagesBackend {
    client: AnthropicClient,
    options: Arc<AgentOptions>,
    max_tokens: u32,
}

impl MessagesBackend {
    pub fn new(api_key: impl Into<String>, options: Arc<AgentOptions>) -> Self {
        Self {
            client: AnthropicClient::new(api_key),
            options,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.client = self.client.with_base_url(url);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn model_id(&self) -> String {
        self.options
            .model()
            .unwrap_or(&Model::Sonnet)
            .api_id()
            .to_string()
    }
}

#[async_trait]
impl Backend for MessagesBackend {
    async fn connect(&self) -> AgentResult<Box<dyn Session>> {
        if !self.options.allowed_tools().is_empty() || !self.options.agents().is_empty() {
            tracing::warn!(
                "[Messages] Tools and subagents are not executed by the API backend ({} tools, {} agents configured)",
                self.options.allowed_tools().len(),
                self.options.agents().len()
            );
        }

        let session = ApiSession::new(
            self.client.clone(),
            self.model_id(),
            self.options.system_prompt().to_string(),
            self.max_tokens,
        );
        tracing::info!("[Messages] Session {} opened", session.id());
        Ok(Box::new(session))
    }

    fn name(&self) -> &str {
        "api"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_defaults_to_sonnet() {
        let backend = MessagesBackend::new("sk", Arc::new(AgentOptions::new("p")));
        assert_eq!(backend.model_id(), "claude-sonnet-4-5");

        let haiku = MessagesBackend::new(
            "sk",
            Arc::new(AgentOptions::new("p").with_model(Model::Haiku)),
        );
        assert_eq!(haiku.model_id(), "claude-haiku-4-5");
    }

    #[tokio::test]
    async fn test_connect_opens_independent_sessions() {
        let backend = MessagesBackend::new("sk", Arc::new(AgentOptions::new("p")));
        let first = backend.connect().await.ok().unwrap();
        let second = backend.connect().await.ok().unwrap();
        assert_ne!(first.session_id(), second.session_id());
    }
}
