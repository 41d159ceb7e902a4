//! In-memory conversation over the Messages API

use std::time::Instant;

use async_stream::try_stream;
use async_trait::async_trait;
use futures::StreamExt;

use crate::backend::{AgentEvent, EventStream, Session, TurnResult};
use crate::core::{AgentError, AgentResult};
use crate::llm::types::ContentDelta;
use crate::llm::{AnthropicClient, Message, MessageRequest, StreamEvent};

pub struct ApiSession {
    id: String,
    client: AnthropicClient,
    model: String,
    system_prompt: String,
    max_tokens: u32,
    history: Vec<Message>,
    pending: Option<String>,
    in_flight: bool,
    closed: bool,
}

impl ApiSession {
    pub fn new(
        client: AnthropicClient,
        model: String,
        system_prompt: String,
        max_tokens: u32,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            client,
            model,
            system_prompt,
            max_tokens,
            history: Vec::new(),
            pending: None,
            in_flight: false,
            closed: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Messages exchanged so far
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    fn build_request(&self, prompt: &str) -> MessageRequest {
        let mut messages = self.history.clone();
        messages.push(Message::user(prompt));
        MessageRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages,
            system: if self.system_prompt.is_empty() {
                None
            } else {
                Some(self.system_prompt.clone())
            },
            stream: true,
        }
    }
}

#[async_trait]
impl Session for ApiSession {
    async fn query(&mut self, prompt: &str) -> AgentResult<()> {
        if self.closed {
            return Err(AgentError::NotConnected);
        }
        if self.in_flight {
            return Err(AgentError::TurnInFlight);
        }
        self.pending = Some(prompt.to_string());
        self.in_flight = true;
        Ok(())
    }

    fn receive_response(&mut self) -> EventStream<'_> {
        Box::pin(try_stream! {
            if let Some(prompt) = self.pending.take() {
                let started = Instant::now();
                let request = self.build_request(&prompt);

                // connect() does no network I/O, so a failed request is a turn failure
                let opened = self.client.stream_message(&request).await.map_err(|e| match e {
                    AgentError::Connect(message) => AgentError::Stream(message),
                    other => other,
                });
                let mut sse = match opened {
                    Ok(sse) => sse,
                    Err(e) => {
                        self.in_flight = false;
                        Err(e)?
                    }
                };

                let mut reply = String::new();
                let mut stop_reason: Option<String> = None;

                loop {
                    let event = match sse.next().await {
                        Some(Ok(event)) => event,
                        Some(Err(e)) => {
                            self.in_flight = false;
                            Err(e)?
                        }
                        None => {
                            self.in_flight = false;
                            Err(AgentError::Stream(
                                "response ended before message_stop".to_string(),
                            ))?
                        }
                    };

                    match event {
                        StreamEvent::MessageStart { message } => {
                            tracing::debug!("[Messages] Message {} on {}", message.id, message.model);
                        }
                        StreamEvent::ContentBlockDelta { delta: ContentDelta::TextDelta { text }, .. } => {
                            reply.push_str(&text);
                            yield AgentEvent::Text { text };
                        }
                        StreamEvent::ContentBlockDelta { delta: ContentDelta::ThinkingDelta { thinking }, .. } => {
                            yield AgentEvent::Thinking { text: thinking };
                        }
                        StreamEvent::MessageDelta { delta, .. } => {
                            stop_reason = delta.stop_reason;
                        }
                        StreamEvent::Error { error } => {
                            self.in_flight = false;
                            tracing::error!("[Messages] Stream error: {} - {}", error.error_type, error.message);
                            Err::<(), _>(AgentError::Stream(format!(
                                "{}: {}",
                                error.error_type, error.message
                            )))?;
                        }
                        StreamEvent::MessageStop => {
                            self.history.push(Message::user(prompt.clone()));
                            self.history.push(Message::assistant(reply.clone()));
                            self.in_flight = false;
                            tracing::info!("[Messages] Turn finished, stop_reason={:?}", stop_reason);

                            yield AgentEvent::Result(TurnResult {
                                is_error: false,
                                subtype: Some(stop_reason.clone().unwrap_or_else(|| "success".to_string())),
                                result: Some(reply.clone()),
                                session_id: Some(self.id.clone()),
                                duration_ms: Some(started.elapsed().as_millis() as u64),
                                num_turns: Some(1),
                                total_cost_usd: None,
                            });
                            break;
                        }
                        _ => {}
                    }
                }
            }
        })
    }

    async fn disconnect(&mut self) -> AgentResult<()> {
        if !self.closed {
            tracing::info!("[Messages] Session {} closed after {} messages", self.id, self.history.len());
        }
        self.closed = true;
        self.in_flight = false;
        self.pending = None;
        self.history.clear();
        Ok(())
    }

    fn session_id(&self) -> Option<&str> {
        Some(&self.id)
    }
}
