//! Messages API client
//!
//! Direct HTTP client for the streaming Messages endpoint. Responses are
//! read as server-sent events and decoded into [`StreamEvent`]s lazily.

use std::pin::Pin;

use futures::stream::Stream;
use futures::StreamExt;
use reqwest::Client;
use tokio::io::AsyncBufReadExt;
use tokio_util::io::StreamReader;

use super::types::{MessageRequest, StreamEvent};
use crate::core::{AgentError, AgentResult};

pub const DEFAULT_API_BASE: &str = "https://api.anthropic.com";
pub const API_VERSION: &str = "2023-06-01";

/// Stream of decoded server-sent events
pub type SseStream = Pin<Box<dyn Stream<Item = AgentResult<StreamEvent>> + Send>>;

/// HTTP client for the Messages API
#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    api_base: String,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Point the client at a different API host
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Send a streaming request
    ///
    /// Failures before the response body starts (network errors, non-2xx
    /// status) are returned as `Connect`. Failures while reading the body
    /// surface as `Stream` items.
    pub async fn stream_message(&self, request: &MessageRequest) -> AgentResult<SseStream> {
        let url = format!("{}/v1/messages", self.api_base);

        let request_json = serde_json::to_string(request)?;
        tracing::debug!("[Messages] Streaming request JSON: {}", request_json);

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .body(request_json)
            .send()
            .await
            .map_err(|e| AgentError::Connect(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            tracing::error!("[Messages] API error: {} - {}", status, error_text);
            return Err(AgentError::Connect(format!(
                "Messages API error ({}): {}",
                status, error_text
            )));
        }

        tracing::info!("[Messages] Streaming response started");

        let byte_stream = response.bytes_stream();
        let stream_reader = StreamReader::new(
            byte_stream.map(|result| result.map_err(|e| std::io::Error::other(e.to_string()))),
        );
        let buf_reader = tokio::io::BufReader::new(stream_reader);

        let stream = async_stream::try_stream! {
            let mut lines = buf_reader.lines();
            while let Some(line) = lines
                .next_line()
                .await
                .map_err(|e| AgentError::Stream(e.to_string()))?
            {
                tracing::trace!("[Messages] SSE line: {}", line);
                if let Some(event) = parse_sse_line(&line) {
                    let stop = matches!(event, StreamEvent::MessageStop);
                    yield event;
                    if stop {
                        break;
                    }
                }
            }
            tracing::info!("[Messages] Stream ended");
        };

        Ok(Box::pin(stream))
    }
}

/// Decode one SSE line; only `data:` lines carry events
pub fn parse_sse_line(line: &str) -> Option<StreamEvent> {
    let data = line.strip_prefix("data:")?.trim_start();
    if data.is_empty() || data == "[DONE]" {
        return None;
    }
    match serde_json::from_str(data) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::warn!("[Messages] Failed to parse SSE data: {}", e);
            None
        }
    }
}
