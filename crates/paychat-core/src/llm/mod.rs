//! Chat provider abstractions for paychat.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: Object-safe wrapper for dynamic dispatch
//! - `RetryingCompletionClient`: bounded exponential backoff on rate limits

pub mod box_provider;
pub mod provider;
pub mod retry;
