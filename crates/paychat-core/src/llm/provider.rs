//! LlmProvider trait definition.
//!
//! This is the port every chat completion backend implements.

use paychat_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for chat completion backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). A rate-limit
/// rejection must be reported as [`LlmError::RateLimited`]; every other
/// variant is treated as non-retryable by the retry client.
///
/// Implementations live in paychat-infra (e.g., `OpenAiChatProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
