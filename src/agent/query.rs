//! Single-shot queries for evaluation and scripting
//!
//! Every call opens its own session, submits exactly one turn, drains it
//! and tears the session down again, whether the call succeeded or not.
//! Nothing is shared between calls, so they can run concurrently.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::time::Instant;

use super::process_agent_options;
use crate::backend::{self, AgentEvent, Backend, Session};
use crate::config::Settings;
use crate::core::{AgentError, AgentResult};

/// Everything a single query produced
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutput {
    /// Concatenated textual content, in arrival order
    pub text: String,
    /// Every event of the turn, including the final result
    pub events: Vec<AgentEvent>,
}

/// Runs one-turn queries against a backend
#[derive(Clone)]
pub struct QueryRunner {
    backend: Arc<dyn Backend>,
    timeout: Option<Duration>,
}

impl QueryRunner {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            timeout: None,
        }
    }

    /// Limit the whole call (connect plus turn) to `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Ask a question and return the agent's text response
    pub async fn ask(&self, prompt: &str) -> AgentResult<String> {
        Ok(self.ask_with_events(prompt).await?.text)
    }

    /// Ask a question and keep every event of the response
    pub async fn ask_with_events(&self, prompt: &str) -> AgentResult<QueryOutput> {
        if prompt.trim().is_empty() {
            return Err(AgentError::InvalidArgument(
                "prompt must not be empty".to_string(),
            ));
        }

        let deadline = self.timeout.map(|limit| (Instant::now() + limit, limit));

        let mut session = within(deadline, self.backend.connect()).await?;
        tracing::debug!("Query session opened: {:?}", session.session_id());

        let outcome = within(deadline, run_turn(&mut session, prompt)).await;

        if let Err(e) = session.disconnect().await {
            tracing::warn!("Error while disconnecting query session: {}", e);
        }

        match &outcome {
            Ok(output) => tracing::info!(
                "Query finished: {} chars, {} events",
                output.text.len(),
                output.events.len()
            ),
            Err(e) => tracing::error!("Query failed: {}", e),
        }
        outcome
    }
}

async fn within<T, F>(deadline: Option<(Instant, Duration)>, fut: F) -> AgentResult<T>
where
    F: Future<Output = AgentResult<T>>,
{
    match deadline {
        None => fut.await,
        Some((at, limit)) => tokio::time::timeout_at(at, fut)
            .await
            .map_err(|_| AgentError::Timeout(limit))?,
    }
}

async fn run_turn(session: &mut Box<dyn Session>, prompt: &str) -> AgentResult<QueryOutput> {
    session.query(prompt).await?;

    let mut text = String::new();
    let mut events = Vec::new();
    let mut stream = session.receive_response();

    while let Some(event) = stream.next().await {
        let event = event?;
        if let Some(chunk) = event.as_text() {
            text.push_str(chunk);
        }
        if let AgentEvent::Result(ref result) = event {
            if result.is_error {
                return Err(AgentError::Backend(result.error_message()));
            }
        }
        events.push(event);
    }

    Ok(QueryOutput { text, events })
}

/// Query the process agent once, configured from the environment
///
/// Loads `.env`, builds the agent's options and the configured backend,
/// and applies `PROCESS_AGENT_TIMEOUT_SECS` if set.
pub async fn query_agent(prompt: &str) -> AgentResult<String> {
    if prompt.trim().is_empty() {
        return Err(AgentError::InvalidArgument(
            "prompt must not be empty".to_string(),
        ));
    }

    let settings = Settings::from_env()?;
    let options = Arc::new(process_agent_options(&settings)?);
    let backend = backend::from_settings(&settings, options);

    let mut runner = QueryRunner::new(backend);
    if let Some(limit) = settings.timeout {
        runner = runner.with_timeout(limit);
    }
    runner.ask(prompt).await
}
