//! Chat completion handler.
//!
//! Stateless: the caller owns the transcript and posts it whole, ending with
//! the new user message. The reply is returned, not stored.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};
use tracing::warn;

use paychat_types::error::ChatError;
use paychat_types::llm::{Message, MessageRole, Transcript};

use crate::http::error::{AppError, RequestError};
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatCompletionBody {
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionData {
    pub message: Message,
}

/// POST /api/v1/chat/completions - Run one exchange over the posted transcript.
pub async fn complete_chat(
    State(state): State<AppState>,
    body: Result<Json<ChatCompletionBody>, JsonRejection>,
) -> Result<Json<ApiResponse<ChatCompletionData>>, RequestError> {
    let timer = RequestTimer::start();
    match run_exchange(&state, body, &timer).await {
        Ok(data) => Ok(Json(timer.success(data))),
        Err(e) => Err(timer.fail(e)),
    }
}

async fn run_exchange(
    state: &AppState,
    body: Result<Json<ChatCompletionBody>, JsonRejection>,
    timer: &RequestTimer,
) -> Result<ChatCompletionData, AppError> {
    let Json(body) = body?;

    if let Some(last) = body.messages.last() {
        if last.role == MessageRole::User && last.content.trim().is_empty() {
            return Err(ChatError::EmptyMessage.into());
        }
    }

    let transcript = Transcript::from_messages(body.messages);
    let cancel = state.shutdown.child_token();

    let message = state
        .chat_client
        .complete_with_cancel(&transcript, &cancel)
        .await
        .inspect_err(|e| {
            warn!(request_id = %timer.request_id, error = %e, "chat completion failed");
        })?;

    Ok(ChatCompletionData { message })
}
