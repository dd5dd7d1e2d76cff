//! Chat bridge module
//!
//! Forwards a prompt to the Anthropic Messages API and unpacks the reply.

mod bridge;
pub mod client;
mod error;
mod types;

pub use bridge::{ChatBridge, extract_reply};
pub use client::Chat;
pub use error::ChatError;
pub use types::{Message, MessagesRequest, MessagesResponse, ResponseBlock, Role, TokenUsage};
