//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use paychat_types::error::ChatError;
use paychat_types::payment::{PAYMENT_FAILED_NOTICE, PaymentFormError};

use super::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
///
/// Messages sent to clients are always the generic notices; the underlying
/// detail is logged where the error happens.
#[derive(Debug)]
pub enum AppError {
    Chat(ChatError),
    PaymentFailed,
    Validation(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::InvalidTranscript(msg) => AppError::Validation(msg),
            ChatError::EmptyMessage => AppError::Validation("message is empty".to_string()),
            other => AppError::Chat(other),
        }
    }
}

impl From<PaymentFormError> for AppError {
    fn from(e: PaymentFormError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::Validation(e.body_text())
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Chat(e @ ChatError::RetryExhausted { .. }) => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMIT_EXHAUSTED",
                e.user_notice().to_string(),
            ),
            AppError::Chat(ChatError::Cancelled) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "CANCELLED",
                "The server is shutting down. Please try again later.".to_string(),
            ),
            AppError::Chat(e) => (
                StatusCode::BAD_GATEWAY,
                "REQUEST_FAILED",
                e.user_notice().to_string(),
            ),
            AppError::PaymentFailed => (
                StatusCode::BAD_GATEWAY,
                "PAYMENT_FAILED",
                PAYMENT_FAILED_NOTICE.to_string(),
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
        }
    }
}

/// An [`AppError`] tied to the request that produced it. The envelope carries
/// the same request id the handler logs.
#[derive(Debug)]
pub struct RequestError {
    pub error: AppError,
    pub request_id: String,
    pub response_time_ms: u64,
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.error.parts();
        let body = ApiResponse::error(code, &message, self.request_id, self.response_time_ms);
        (status, Json(body)).into_response()
    }
}
