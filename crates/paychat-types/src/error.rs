use thiserror::Error;

use crate::llm::LlmError;

/// Notice shown when the rate-limit retry budget is used up.
pub const RATE_LIMIT_NOTICE: &str = "Rate limit exceeded. Please try again later.";

/// Notice shown for any non-retryable chat failure.
pub const REQUEST_FAILED_NOTICE: &str =
    "There was an error with the request. Please try again later.";

/// Terminal outcomes of a chat exchange that did not produce a reply.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("rate limit exhausted after {attempts} attempts")]
    RetryExhausted { attempts: u32 },

    #[error("request failed: {0}")]
    RequestFailed(#[source] LlmError),

    #[error("exchange cancelled")]
    Cancelled,

    #[error("message is empty")]
    EmptyMessage,

    #[error("invalid transcript: {0}")]
    InvalidTranscript(String),
}

impl ChatError {
    /// Generic, non-technical text for end users.
    pub fn user_notice(&self) -> &'static str {
        match self {
            ChatError::RetryExhausted { .. } => RATE_LIMIT_NOTICE,
            _ => REQUEST_FAILED_NOTICE,
        }
    }
}

/// Fatal errors during process startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,

    #[error("database connection failed: {0}")]
    Database(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}
