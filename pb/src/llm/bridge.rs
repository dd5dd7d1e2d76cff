//! Anthropic Messages API bridge
//!
//! One prompt in, one reply out. No retries, no streaming, no conversation
//! state: each call is a single `POST /v1/messages`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use super::{Chat, ChatError, Message, MessagesRequest, MessagesResponse};
use crate::config::LlmConfig;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Stateless client for the chat endpoint
pub struct ChatBridge {
    model: String,
    max_tokens: u32,
    endpoint: String,
    api_key: Option<String>,
    http: Client,
}

impl ChatBridge {
    /// Create a bridge with the default model, token cap and endpoint
    pub fn new() -> Result<Self, ChatError> {
        Self::from_config(&LlmConfig::default())
    }

    /// Create a new bridge from configuration
    ///
    /// The API key is read from the environment variable named in config. A
    /// missing key is not an error here; the service will reject the request.
    pub fn from_config(config: &LlmConfig) -> Result<Self, ChatError> {
        debug!(?config, "from_config: called");
        let mut builder = Client::builder();
        if let Some(ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let http = builder.build().map_err(ChatError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            endpoint: format!("{}/v1/messages", config.base_url.trim_end_matches('/')),
            api_key: config.api_key(),
            http,
        })
    }

    /// Use `key` for the `x-api-key` header instead of the environment
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Full URL requests are posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Build the request body for one prompt
    pub fn build_request(&self, prompt: &str) -> MessagesRequest {
        MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![Message::user(prompt)],
        }
    }
}

/// Take the text of the first content block
pub fn extract_reply(response: MessagesResponse) -> Result<String, ChatError> {
    debug!(
        blocks = response.content.len(),
        stop_reason = ?response.stop_reason,
        "extract_reply: called"
    );
    let first = response
        .content
        .into_iter()
        .next()
        .ok_or_else(|| ChatError::MalformedResponse("response has no content blocks".to_string()))?;

    first.text.ok_or_else(|| {
        ChatError::MalformedResponse(format!(
            "first content block has no text (type: {})",
            first.kind.as_deref().unwrap_or("unknown")
        ))
    })
}

#[async_trait]
impl Chat for ChatBridge {
    async fn try_send(&self, prompt: &str) -> Result<String, ChatError> {
        debug!(%self.model, %self.max_tokens, prompt_len = prompt.len(), "try_send: called");
        let body = self.build_request(prompt);

        let mut request = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header("anthropic-version", ANTHROPIC_VERSION);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            debug!(%status, "try_send: API error");
            let message = response.text().await.unwrap_or_default();
            return Err(ChatError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        let parsed: MessagesResponse = serde_json::from_str(&text)?;
        if let Some(usage) = &parsed.usage {
            debug!(usage.input_tokens, usage.output_tokens, "try_send: usage");
        }
        extract_reply(parsed)
    }
}
