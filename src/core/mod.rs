//! Core types shared by every layer of the agent

pub mod error;

pub use error::{AgentError, AgentResult};
