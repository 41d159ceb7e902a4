//! Messages API client used by the HTTP backend

pub mod anthropic;
pub mod types;

pub use anthropic::{AnthropicClient, SseStream};
pub use types::{ContentDelta, Message, MessageRequest, StreamEvent};
