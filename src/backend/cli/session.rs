//! A running agent runtime process

use std::io;
use std::time::Duration;

use async_stream::try_stream;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout};
use tokio::task::JoinHandle;

use super::parser::StreamParser;
use super::types::UserLine;
use crate::backend::{AgentEvent, EventStream, Session};
use crate::core::{AgentError, AgentResult};

/// How long the runtime gets to exit after stdin closes
const SHUTDOWN_GRACE: Duration = Duration::from_secs(3);

/// Session id sent with every user line; the runtime assigns its own
const CLIENT_SESSION_ID: &str = "default";

/// One runtime child process carrying a sequence of turns
pub struct CliSession {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: Lines<BufReader<ChildStdout>>,
    stderr_task: Option<JoinHandle<()>>,
    parser: StreamParser,
    turn_in_flight: bool,
    exited: bool,
}

impl CliSession {
    /// Wrap a freshly spawned runtime process
    pub fn new(mut child: Child) -> AgentResult<Self> {
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| AgentError::Connect("failed to capture runtime stdin".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AgentError::Connect("failed to capture runtime stdout".to_string()))?;

        // stderr is diagnostics only; forward it to the log
        let stderr_task = child.stderr.take().map(|stderr| {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    tracing::warn!("[runtime stderr] {}", line);
                }
            })
        });

        tracing::info!("Runtime process started (pid {:?})", child.id());

        Ok(Self {
            child,
            stdin: Some(stdin),
            stdout: BufReader::new(stdout).lines(),
            stderr_task,
            parser: StreamParser::new(),
            turn_in_flight: false,
            exited: false,
        })
    }

    /// Read the next stdout line of the current turn
    ///
    /// `Ok(None)` is a line that is not valid UTF-8. It is skipped like any
    /// other malformed line so the rest of the turn is still read.
    async fn next_line(&mut self) -> AgentResult<Option<String>> {
        match self.stdout.next_line().await {
            Ok(Some(line)) => Ok(Some(line)),
            Ok(None) => {
                self.turn_in_flight = false;
                self.exited = true;
                tracing::error!("Runtime closed its output before the turn finished");
                Err(AgentError::SessionInvalid(
                    "agent runtime exited before the turn finished".to_string(),
                ))
            }
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                tracing::warn!("Skipping undecodable runtime line: {}", e);
                Ok(None)
            }
            Err(e) => {
                // The rest of the turn cannot be read past, so the output is out of sync
                self.turn_in_flight = false;
                self.exited = true;
                tracing::error!("Failed to read runtime output: {}", e);
                Err(AgentError::SessionInvalid(format!(
                    "failed to read agent runtime output: {}",
                    e
                )))
            }
        }
    }
}

#[async_trait]
impl Session for CliSession {
    async fn query(&mut self, prompt: &str) -> AgentResult<()> {
        if self.turn_in_flight {
            return Err(AgentError::TurnInFlight);
        }
        if self.exited {
            return Err(AgentError::SessionInvalid(
                "agent runtime is no longer running".to_string(),
            ));
        }
        let stdin = self.stdin.as_mut().ok_or(AgentError::NotConnected)?;

        let mut line = serde_json::to_string(&UserLine::new(prompt, CLIENT_SESSION_ID))?;
        line.push('\n');
        tracing::debug!("Submitting turn ({} chars)", prompt.len());

        let written = async {
            stdin.write_all(line.as_bytes()).await?;
            stdin.flush().await
        }
        .await;

        if let Err(e) = written {
            // A closed pipe means the process is gone
            self.exited = true;
            tracing::error!("Failed to write to runtime: {}", e);
            return Err(AgentError::SessionInvalid(format!(
                "failed to write to agent runtime: {}",
                e
            )));
        }

        self.turn_in_flight = true;
        Ok(())
    }

    fn receive_response(&mut self) -> EventStream<'_> {
        Box::pin(try_stream! {
            while self.turn_in_flight {
                let Some(line) = self.next_line().await? else {
                    continue;
                };
                tracing::trace!("Runtime line: {}", line);

                for event in self.parser.parse_line(&line) {
                    if let AgentEvent::Result(ref result) = event {
                        self.turn_in_flight = false;
                        tracing::info!(
                            "Turn finished: error={}, turns={:?}, cost={:?}",
                            result.is_error,
                            result.num_turns,
                            result.total_cost_usd
                        );
                    }
                    yield event;
                }
            }
        })
    }

    async fn disconnect(&mut self) -> AgentResult<()> {
        // Closing stdin asks the runtime to finish
        let Some(stdin) = self.stdin.take() else {
            return Ok(());
        };
        drop(stdin);
        self.turn_in_flight = false;

        if !self.exited {
            match tokio::time::timeout(SHUTDOWN_GRACE, self.child.wait()).await {
                Ok(Ok(status)) => tracing::info!("Runtime exited: {}", status),
                Ok(Err(e)) => tracing::warn!("Failed to wait for runtime: {}", e),
                Err(_) => {
                    tracing::warn!("Runtime did not exit within {:?}, killing", SHUTDOWN_GRACE);
                    self.child.kill().await?;
                }
            }
            self.exited = true;
        }

        if let Some(task) = self.stderr_task.take() {
            task.abort();
        }
        Ok(())
    }

    fn session_id(&self) -> Option<&str> {
        self.parser.session_id()
    }
}
