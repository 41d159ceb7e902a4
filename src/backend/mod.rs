//! Backend abstraction over the agent runtime
//!
//! A [`Backend`] opens [`Session`]s. A session carries an ordered sequence
//! of turns: `query` submits one prompt, `receive_response` yields that
//! turn's events until the terminal [`AgentEvent::Result`]. The stream
//! borrows the session mutably, so the next turn cannot be submitted
//! while the current one is still being drained.
//!
//! Two implementations are provided:
//! - [`ClaudeCliBackend`] runs the agent runtime as a child process
//! - [`MessagesBackend`] talks to the Messages API directly (chat only)

pub mod api;
pub mod cli;
mod event;

use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures::Stream;

use crate::config::{AgentOptions, BackendKind, Settings};
use crate::core::AgentResult;

pub use api::MessagesBackend;
pub use cli::ClaudeCliBackend;
pub use event::{AgentEvent, TurnResult};

/// Lazy, ordered, finite stream of one turn's events
pub type EventStream<'a> = Pin<Box<dyn Stream<Item = AgentResult<AgentEvent>> + Send + 'a>>;

/// A live connection to the agent runtime
#[async_trait]
pub trait Session: Send {
    /// Submit one user turn
    ///
    /// Fails with `TurnInFlight` if the previous turn has not been drained.
    async fn query(&mut self, prompt: &str) -> AgentResult<()>;

    /// Stream the events of the submitted turn
    ///
    /// The stream ends after the terminal result event, or with an error.
    fn receive_response(&mut self) -> EventStream<'_>;

    /// Tear the session down. Calling it twice is harmless.
    async fn disconnect(&mut self) -> AgentResult<()>;

    /// Runtime-assigned session id, once known
    fn session_id(&self) -> Option<&str> {
        None
    }
}

/// Factory for sessions, constructed with the agent's configuration
#[async_trait]
pub trait Backend: Send + Sync {
    /// Open a new, independent session
    async fn connect(&self) -> AgentResult<Box<dyn Session>>;

    /// Short name for logs
    fn name(&self) -> &str;
}

/// Build the backend selected by the settings
pub fn from_settings(settings: &Settings, options: Arc<AgentOptions>) -> Arc<dyn Backend> {
    match settings.backend {
        BackendKind::Cli => Arc::new(ClaudeCliBackend::new(
            settings.cli_path.clone(),
            settings.api_key.clone(),
            options,
        )),
        BackendKind::Api => {
            let mut backend = MessagesBackend::new(settings.api_key.clone(), options);
            if let Some(ref url) = settings.api_base_url {
                backend = backend.with_base_url(url.clone());
            }
            if let Some(max_tokens) = settings.max_tokens {
                backend = backend.with_max_tokens(max_tokens);
            }
            Arc::new(backend)
        }
    }
}
