//! Messages API request/response types

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Body of a `POST /v1/messages` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagesRequest {
    /// Model identifier (from config, never from the caller)
    pub model: String,

    /// Reply size cap in tokens (from config)
    pub max_tokens: u32,

    /// Conversation turns; always a single user turn here
    pub messages: Vec<Message>,
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a user message with text content
    pub fn user(text: impl Into<String>) -> Self {
        debug!("Message::user: called");
        Self {
            role: Role::User,
            content: text.into(),
        }
    }
}

/// Message role
///
/// Requests carry a single user turn, so `user` is the only role sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

/// Successful response body
///
/// Only `content` matters for the reply. The rest is kept for diagnostics and
/// is optional so that minimal payloads like `{"content":[{"text":"hi"}]}`
/// still parse.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ResponseBlock>,

    #[serde(default)]
    pub stop_reason: Option<String>,

    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

/// One element of the response `content` array
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseBlock {
    /// Block type ("text", "tool_use", ...) when the service sends one
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub text: Option<String>,
}

/// Token usage reported by the service
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
}
