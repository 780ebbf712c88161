//! Rate-limit aware completion client.
//!
//! [`RetryingCompletionClient`] sends a transcript to an [`LlmProvider`] and
//! retries only on rate-limit rejections, with exponential backoff and a hard
//! cap on attempts:
//!
//! | call | outcome | next step |
//! |------|---------|-----------|
//! | 1    | 429     | wait 2s   |
//! | 2    | 429     | wait 4s   |
//! | 3    | 429     | wait 8s   |
//! | 4    | 429     | wait 16s  |
//! | 5    | 429     | `RetryExhausted` |
//!
//! Any success returns at once. Any other error is terminal on the first
//! occurrence. There is no jitter and no state carried between requests.

use std::fmt;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info_span, warn};

use paychat_types::config::RetryConfig;
use paychat_types::error::ChatError;
use paychat_types::llm::{CompletionRequest, Message, MessageRole, Transcript};

use super::provider::LlmProvider;

// ---------------------------------------------------------------------------
// RetryPolicy
// ---------------------------------------------------------------------------

/// Attempt cap and backoff unit for rate-limited calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first call.
    pub max_attempts: u32,
    /// Retry `n` (counted from 1) waits `base_delay * 2^n`.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

    /// Backoff before retry number `retry` (1-based).
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 2u32.checked_pow(retry).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Sum of every backoff the policy can impose before giving up.
    pub fn worst_case_wait(&self) -> Duration {
        (1..self.max_attempts).fold(Duration::ZERO, |acc, n| {
            acc.saturating_add(self.backoff_for(n))
        })
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            base_delay: Self::DEFAULT_BASE_DELAY,
        }
    }
}

impl From<RetryConfig> for RetryPolicy {
    fn from(config: RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
        }
    }
}

// ---------------------------------------------------------------------------
// RetryState
// ---------------------------------------------------------------------------

/// Per-request retry bookkeeping. Created fresh for every outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    attempt: u32,
    max_attempts: u32,
}

impl RetryState {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            attempt: 0,
            max_attempts,
        }
    }

    /// Retries consumed so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Calls made so far, counting the one that just failed.
    pub fn calls_made(&self) -> u32 {
        self.attempt + 1
    }

    /// Record a rate-limit rejection.
    ///
    /// Returns the retry number to wait for, or `None` once the budget is
    /// spent. `attempt` never exceeds `max_attempts`.
    pub fn register_rate_limit(&mut self) -> Option<u32> {
        if self.attempt + 1 >= self.max_attempts {
            return None;
        }
        self.attempt += 1;
        Some(self.attempt)
    }
}

// ---------------------------------------------------------------------------
// ExchangeState
// ---------------------------------------------------------------------------

/// States of one exchange, logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    Idle,
    Sending,
    RateLimited,
    WaitingBackoff,
    Success,
    Failed,
    Cancelled,
}

impl fmt::Display for ExchangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeState::Idle => write!(f, "idle"),
            ExchangeState::Sending => write!(f, "sending"),
            ExchangeState::RateLimited => write!(f, "rate_limited"),
            ExchangeState::WaitingBackoff => write!(f, "waiting_backoff"),
            ExchangeState::Success => write!(f, "success"),
            ExchangeState::Failed => write!(f, "failed"),
            ExchangeState::Cancelled => write!(f, "cancelled"),
        }
    }
}

fn transition(state: &mut ExchangeState, next: ExchangeState) {
    debug!(from = %state, to = %next, "exchange state");
    *state = next;
}

// ---------------------------------------------------------------------------
// RetryingCompletionClient
// ---------------------------------------------------------------------------

/// Chat completion client with bounded exponential backoff on rate limits.
pub struct RetryingCompletionClient<P> {
    provider: P,
    model: String,
    policy: RetryPolicy,
}

impl<P: LlmProvider> RetryingCompletionClient<P> {
    pub fn new(provider: P, model: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            provider,
            model: model.into(),
            policy,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Send the transcript and return exactly one assistant message or a
    /// terminal failure. Never cancelled.
    pub async fn complete(&self, transcript: &Transcript) -> Result<Message, ChatError> {
        self.complete_with_cancel(transcript, &CancellationToken::new())
            .await
    }

    /// Like [`complete`](Self::complete), but stops with
    /// [`ChatError::Cancelled`] once `cancel` fires.
    ///
    /// The token is checked before every attempt and raced against both the
    /// in-flight call and the backoff wait.
    pub async fn complete_with_cancel(
        &self,
        transcript: &Transcript,
        cancel: &CancellationToken,
    ) -> Result<Message, ChatError> {
        match transcript.last() {
            Some(last) if last.role == MessageRole::User => {}
            Some(last) => {
                return Err(ChatError::InvalidTranscript(format!(
                    "last message must be from the user, found {}",
                    last.role
                )));
            }
            None => {
                return Err(ChatError::InvalidTranscript(
                    "transcript is empty".to_string(),
                ));
            }
        }

        let request = CompletionRequest {
            model: self.model.clone(),
            messages: transcript.messages().to_vec(),
        };

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.messages = request.messages.len(),
        );

        self.run(&request, cancel).instrument(span).await
    }

    async fn run(
        &self,
        request: &CompletionRequest,
        cancel: &CancellationToken,
    ) -> Result<Message, ChatError> {
        let mut retry = RetryState::new(self.policy.max_attempts);
        let mut state = ExchangeState::Idle;

        loop {
            if cancel.is_cancelled() {
                transition(&mut state, ExchangeState::Cancelled);
                return Err(ChatError::Cancelled);
            }

            transition(&mut state, ExchangeState::Sending);
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    transition(&mut state, ExchangeState::Cancelled);
                    return Err(ChatError::Cancelled);
                }
                outcome = self.provider.complete(request) => outcome,
            };

            match outcome {
                Ok(response) => {
                    transition(&mut state, ExchangeState::Success);
                    debug!(
                        calls = retry.calls_made(),
                        response_id = ?response.id,
                        "completion succeeded"
                    );
                    return Ok(Message::assistant(response.message.content));
                }
                Err(err) if err.is_rate_limited() => {
                    transition(&mut state, ExchangeState::RateLimited);
                    let Some(retry_number) = retry.register_rate_limit() else {
                        transition(&mut state, ExchangeState::Failed);
                        warn!(
                            attempts = retry.calls_made(),
                            "rate limit retries exhausted"
                        );
                        return Err(ChatError::RetryExhausted {
                            attempts: retry.calls_made(),
                        });
                    };

                    let wait = self.policy.backoff_for(retry_number);
                    warn!(
                        retry = retry_number,
                        wait_ms = wait.as_millis() as u64,
                        "rate limit exceeded, backing off"
                    );

                    transition(&mut state, ExchangeState::WaitingBackoff);
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            transition(&mut state, ExchangeState::Cancelled);
                            return Err(ChatError::Cancelled);
                        }
                        _ = tokio::time::sleep(wait) => {}
                    }
                }
                Err(err) => {
                    transition(&mut state, ExchangeState::Failed);
                    error!(error = %err, "completion request failed");
                    return Err(ChatError::RequestFailed(err));
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
