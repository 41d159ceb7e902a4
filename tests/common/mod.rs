//! Scripted in-memory backend for driving the agent without a runtime

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_stream::try_stream;
use async_trait::async_trait;

use process_agent::backend::{AgentEvent, Backend, EventStream, Session, TurnResult};
use process_agent::core::{AgentError, AgentResult};

/// How a session answers one prompt
#[derive(Debug, Clone)]
pub enum Reply {
    /// Yield these events, then end the turn
    Events(Vec<AgentEvent>),
    /// Yield these events, then fail the stream
    FailMidStream(Vec<AgentEvent>, String),
    /// The runtime went away; the session is unusable
    Invalid,
    /// Never produce an event
    Hang,
}

impl Reply {
    /// Text chunks followed by a successful result
    pub fn text(chunks: &[&str]) -> Self {
        let mut events: Vec<AgentEvent> = chunks.iter().map(|c| AgentEvent::text(*c)).collect();
        events.push(AgentEvent::Result(TurnResult::success()));
        Reply::Events(events)
    }

    pub fn error_result(message: &str) -> Self {
        Reply::Events(vec![AgentEvent::Result(TurnResult::error(message))])
    }
}

type Responder = dyn Fn(&str) -> Reply + Send + Sync;

#[derive(Default)]
struct Counters {
    connect_attempts: AtomicUsize,
    sessions: AtomicUsize,
    disconnects: AtomicUsize,
    prompts: Mutex<Vec<(usize, String)>>,
}

pub struct ScriptedBackend {
    counters: Arc<Counters>,
    responder: Arc<Responder>,
    connect_limit: Option<usize>,
}

impl ScriptedBackend {
    pub fn new(responder: impl Fn(&str) -> Reply + Send + Sync + 'static) -> Self {
        Self {
            counters: Arc::new(Counters::default()),
            responder: Arc::new(responder),
            connect_limit: None,
        }
    }

    /// Answers every prompt with `echo: <prompt>` in two chunks
    pub fn echo() -> Self {
        Self::new(|prompt| Reply::text(&["echo: ", prompt]))
    }

    /// Only the first `limit` connects succeed
    pub fn with_connect_limit(mut self, limit: usize) -> Self {
        self.connect_limit = Some(limit);
        self
    }

    pub fn connect_attempts(&self) -> usize {
        self.counters.connect_attempts.load(Ordering::SeqCst)
    }

    pub fn sessions(&self) -> usize {
        self.counters.sessions.load(Ordering::SeqCst)
    }

    pub fn disconnects(&self) -> usize {
        self.counters.disconnects.load(Ordering::SeqCst)
    }

    /// Every submitted prompt with the number of the session it went to
    pub fn prompts(&self) -> Vec<(usize, String)> {
        self.counters.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn connect(&self) -> AgentResult<Box<dyn Session>> {
        let attempt = self.counters.connect_attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(limit) = self.connect_limit {
            if attempt > limit {
                return Err(AgentError::Connect("scripted connect failure".to_string()));
            }
        }
        let number = self.counters.sessions.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Box::new(ScriptedSession {
            number,
            session_id: format!("session-{}", number),
            counters: self.counters.clone(),
            responder: self.responder.clone(),
            pending: None,
            closed: false,
        }))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

struct ScriptedSession {
    number: usize,
    session_id: String,
    counters: Arc<Counters>,
    responder: Arc<Responder>,
    pending: Option<Reply>,
    closed: bool,
}

#[async_trait]
impl Session for ScriptedSession {
    async fn query(&mut self, prompt: &str) -> AgentResult<()> {
        if self.closed {
            return Err(AgentError::NotConnected);
        }
        if self.pending.is_some() {
            return Err(AgentError::TurnInFlight);
        }
        self.counters
            .prompts
            .lock()
            .unwrap()
            .push((self.number, prompt.to_string()));
        self.pending = Some((self.responder)(prompt));
        Ok(())
    }

    fn receive_response(&mut self) -> EventStream<'_> {
        let reply = self.pending.take();
        Box::pin(try_stream! {
            match reply {
                None => {}
                Some(Reply::Events(events)) => {
                    for event in events {
                        yield event;
                    }
                }
                Some(Reply::FailMidStream(events, message)) => {
                    for event in events {
                        yield event;
                    }
                    Err::<(), _>(AgentError::Stream(message))?;
                }
                Some(Reply::Invalid) => {
                    Err::<(), _>(AgentError::SessionInvalid("runtime exited".to_string()))?;
                }
                Some(Reply::Hang) => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                }
            }
        })
    }

    async fn disconnect(&mut self) -> AgentResult<()> {
        if !self.closed {
            self.closed = true;
            self.counters.disconnects.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    fn session_id(&self) -> Option<&str> {
        Some(&self.session_id)
    }
}
