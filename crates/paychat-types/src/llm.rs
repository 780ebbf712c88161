//! Chat completion types for paychat.
//!
//! These types model the data shapes for chat API interactions: messages,
//! the conversation transcript, completion requests/responses, and the
//! provider-level error type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default system message seeded at the start of every transcript.
pub const DEFAULT_SYSTEM_PROMPT: &str = "Hello! How can I help you today?";

/// Role of a message in a chat conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message in a chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered conversation history sent to the chat API, oldest first.
///
/// A transcript created with [`Transcript::new`] starts with exactly one
/// system message. It only grows through [`Transcript::append`]; the one
/// way to drop messages is [`Transcript::reset`], which returns to the seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Create a transcript seeded with one system message.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    /// Wrap an existing message list (e.g. one posted by an HTTP caller).
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Append one message to the end of the transcript.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Messages shown to the user: everything after the leading system seed.
    pub fn visible(&self) -> impl Iterator<Item = &Message> {
        let skip = match self.messages.first() {
            Some(m) if m.role == MessageRole::System => 1,
            _ => 0,
        };
        self.messages.iter().skip(skip)
    }

    /// Drop every message after the leading system seed.
    pub fn reset(&mut self) {
        let keep = match self.messages.first() {
            Some(m) if m.role == MessageRole::System => 1,
            _ => 0,
        };
        self.messages.truncate(keep);
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT)
    }
}

/// Request to a chat provider for a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
}

/// Response from a chat provider for a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// The reply message (always role `assistant`).
    pub message: Message,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// Token usage for a completion request/response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// Errors from chat provider operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("provider error (HTTP {status}): {message}")]
    Provider { status: u16, message: String },

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("no API key configured for the chat provider")]
    MissingCredential,

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

impl LlmError {
    /// Whether this error is the retryable rate-limit class.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, LlmError::RateLimited { .. })
    }
}
