//! Session manager for chat conversations.
//!
//! Wraps a `Transcript` with exchange tracking and lifecycle management.
//! `send` takes `&mut self`, so a session can never have two exchanges in
//! flight at once.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use paychat_types::error::ChatError;
use paychat_types::llm::{Message, Transcript};

use crate::llm::provider::LlmProvider;
use crate::llm::retry::RetryingCompletionClient;

/// Manages the transcript and lifecycle of a single chat session.
pub struct ChatSession<P> {
    id: Uuid,
    transcript: Transcript,
    client: Arc<RetryingCompletionClient<P>>,
    cancel: CancellationToken,
    /// Completed exchanges (user message answered by the assistant).
    exchange_count: u32,
}

impl<P: LlmProvider> ChatSession<P> {
    /// Start a session whose transcript is seeded with `system_prompt`.
    pub fn new(client: Arc<RetryingCompletionClient<P>>, system_prompt: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            transcript: Transcript::new(system_prompt),
            client,
            cancel: CancellationToken::new(),
            exchange_count: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn exchange_count(&self) -> u32 {
        self.exchange_count
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Run one exchange.
    ///
    /// The user message is appended before the call and stays in the
    /// transcript whatever the outcome. The assistant reply is appended only
    /// on success.
    pub async fn send(&mut self, input: &str) -> Result<Message, ChatError> {
        if input.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if self.is_closed() {
            return Err(ChatError::Cancelled);
        }

        self.transcript.append(Message::user(input));
        debug!(session_id = %self.id, messages = self.transcript.len(), "sending exchange");

        let exchange_cancel = self.cancel.child_token();
        let reply = self
            .client
            .complete_with_cancel(&self.transcript, &exchange_cancel)
            .await?;

        self.transcript.append(reply.clone());
        self.exchange_count += 1;
        Ok(reply)
    }

    /// Drop the conversation back to the seeded system message.
    pub fn reset(&mut self) {
        info!(session_id = %self.id, "session reset");
        self.transcript.reset();
        self.exchange_count = 0;
    }

    /// Close the session. Any retry loop still running for it stops at its
    /// next checkpoint and later `send` calls return `Cancelled`.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    /// A handle that closes this session when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}
