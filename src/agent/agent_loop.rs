//! Interactive agent loop
//!
//! Reads one line at a time and either handles it as a control command
//! (`exit`, `quit`, `new`) or submits it as a turn. Each turn's event
//! stream is drained and rendered completely before the next line is
//! read, so turns never overlap on the session.

use std::sync::Arc;

use futures::StreamExt;

use crate::backend::{AgentEvent, Backend, Session};
use crate::cli::Console;
use crate::core::{AgentError, AgentResult};

/// Where the driver is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Disconnected,
    Idle,
    TurnInFlight,
}

/// A classified line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Blank,
    Exit,
    NewConversation,
    Prompt(String),
}

/// What the loop should do after a line was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Classify a line of input; control words match case-insensitively
pub fn parse_input(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Blank;
    }
    match trimmed.to_lowercase().as_str() {
        "exit" | "quit" => Command::Exit,
        "new" => Command::NewConversation,
        _ => Command::Prompt(trimmed.to_string()),
    }
}

/// The interactive driver that owns one backend session at a time
pub struct Agent {
    backend: Arc<dyn Backend>,
    console: Console,
    session: Option<Box<dyn Session>>,
    turn_count: usize,
    state: DriverState,
}

impl Agent {
    pub fn new(backend: Arc<dyn Backend>, console: Console) -> Self {
        tracing::info!("Creating agent on '{}' backend", backend.name());
        Self {
            backend,
            console,
            session: None,
            turn_count: 0,
            state: DriverState::Disconnected,
        }
    }

    /// Turns submitted since the session was (re)established
    pub fn turn_count(&self) -> usize {
        self.turn_count
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Establish a session
    pub async fn connect(&mut self) -> AgentResult<()> {
        if self.session.is_some() {
            self.shutdown().await;
        }

        let session = self.backend.connect().await.map_err(|e| {
            tracing::error!("Failed to establish session: {}", e);
            e
        })?;
        tracing::info!("Session established: {:?}", session.session_id());

        self.session = Some(session);
        self.turn_count = 0;
        self.state = DriverState::Idle;
        Ok(())
    }

    /// Tear down the current session, if any
    pub async fn shutdown(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Err(e) = session.disconnect().await {
                tracing::warn!("Error while disconnecting: {}", e);
            }
            tracing::info!("Session closed");
        }
        self.state = DriverState::Disconnected;
    }

    /// Handle one line of input
    ///
    /// Turn failures are reported and swallowed. An `Err` means the loop
    /// cannot go on (the session could not be re-established, or the
    /// backend declared it invalid).
    pub async fn handle_input(&mut self, line: &str) -> AgentResult<LoopControl> {
        match parse_input(line) {
            Command::Blank => {
                tracing::debug!("Empty input, skipping");
                Ok(LoopControl::Continue)
            }
            Command::Exit => {
                tracing::info!("User requested exit");
                self.console.print_system("Ending session. Goodbye!");
                Ok(LoopControl::Exit)
            }
            Command::NewConversation => {
                tracing::info!("Starting new conversation");
                self.connect().await?;
                self.console
                    .print_system("Started new conversation (previous context cleared)");
                Ok(LoopControl::Continue)
            }
            Command::Prompt(prompt) => {
                self.console.println();
                let outcome = self.process_turn(&prompt).await;
                self.console.println();
                self.console.print_separator();

                match outcome {
                    Ok(()) => Ok(LoopControl::Continue),
                    Err(e) if e.is_fatal() => Err(e),
                    Err(e) => {
                        tracing::error!("Turn {} failed: {}", self.turn_count, e);
                        self.console.print_error(&e.to_string());
                        Ok(LoopControl::Continue)
                    }
                }
            }
        }
    }

    /// Submit one turn and render its events in arrival order
    async fn process_turn(&mut self, prompt: &str) -> AgentResult<()> {
        let session = self.session.as_mut().ok_or(AgentError::NotConnected)?;

        session.query(prompt).await?;
        self.turn_count += 1;
        self.state = DriverState::TurnInFlight;
        tracing::info!("Turn {} submitted", self.turn_count);

        self.console.print_agent_prefix();

        let mut events = session.receive_response();
        let mut received = 0usize;
        while let Some(event) = events.next().await {
            let event = match event {
                Ok(event) => event,
                Err(e) => {
                    self.state = DriverState::Idle;
                    return Err(e);
                }
            };
            received += 1;
            if let AgentEvent::Result(ref result) = event {
                if result.is_error {
                    tracing::warn!("Turn {} ended with error: {}", self.turn_count, result.error_message());
                }
            }
            self.console.render_event(&event);
        }

        self.state = DriverState::Idle;
        tracing::debug!("Turn {} drained ({} events)", self.turn_count, received);
        Ok(())
    }

    /// Run the interactive loop until exit, end of input, or a fatal error
    pub async fn run(&mut self) -> AgentResult<()> {
        tracing::info!("Starting agent loop");
        self.console.print_banner();

        if let Err(e) = self.connect().await {
            self.console.print_error(&e.to_string());
            return Err(e);
        }

        let outcome = loop {
            let line = match self.console.read_input(self.turn_count + 1) {
                Ok(Some(line)) => line,
                Ok(None) => {
                    tracing::info!("End of input");
                    self.console.println();
                    self.console.print_system("Ending session. Goodbye!");
                    break Ok(());
                }
                Err(e) => {
                    tracing::error!("Failed to read user input: {}", e);
                    self.console
                        .print_error(&format!("Failed to read input: {}", e));
                    break Err(AgentError::Io(e));
                }
            };

            match self.handle_input(&line).await {
                Ok(LoopControl::Continue) => {}
                Ok(LoopControl::Exit) => break Ok(()),
                Err(e) => {
                    self.console.print_error(&e.to_string());
                    break Err(e);
                }
            }
        };

        self.shutdown().await;
        tracing::info!("Agent loop ended");
        outcome
    }
}
