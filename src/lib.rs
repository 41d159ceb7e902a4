//! Process agent
//!
//! A thin client for a conversational agent that runs on an external agent
//! runtime. The crate holds the agent's configuration, an interactive
//! terminal loop ([`agent::Agent`]) and a single-shot query entry point
//! for evaluation code ([`agent::query_agent`]).

pub mod agent;
pub mod backend;
pub mod cli;
pub mod config;
pub mod core;
pub mod llm;
pub mod logging;
pub mod permissions;
pub mod tools;

pub use agent::{query_agent, Agent, QueryOutput, QueryRunner};
pub use backend::{AgentEvent, Backend, Session, TurnResult};
pub use config::{AgentOptions, Settings};
pub use crate::core::{AgentError, AgentResult};
