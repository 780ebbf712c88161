//! Payment initiation types.
//!
//! `PaymentRequest` mirrors the payment gateway's `initiate-pay` body.
//! Optional fields are omitted from the JSON when unset.

use serde::{Deserialize, Serialize};

/// Confirmation text used when the gateway returns no `message`.
pub const DEFAULT_PAYMENT_CONFIRMATION: &str = "Payment initiation successful.";

/// The one failure text shown for any payment failure.
pub const PAYMENT_FAILED_NOTICE: &str = "Payment initiation failed. Please try again.";

/// A single payment submission. Sent once, never retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub amount: u64,
    pub redirect_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "externalId", skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PaymentRequest {
    pub fn new(amount: u64, redirect_url: impl Into<String>) -> Self {
        Self {
            amount,
            redirect_url: redirect_url.into(),
            name: None,
            email: None,
            user_id: None,
            external_id: None,
            message: None,
        }
    }
}

/// Gateway response to a payment initiation. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResponse {
    #[serde(default)]
    pub message: Option<String>,
    /// Checkout link the payer should be sent to.
    #[serde(default)]
    pub link: Option<String>,
    #[serde(rename = "transId", default)]
    pub trans_id: Option<String>,
    #[serde(rename = "dateInitiated", default)]
    pub date_initiated: Option<String>,
}

impl PaymentResponse {
    /// The server-provided message, or the generic confirmation when absent.
    pub fn confirmation_text(&self) -> &str {
        match self.message.as_deref() {
            Some(m) if !m.is_empty() => m,
            _ => DEFAULT_PAYMENT_CONFIRMATION,
        }
    }
}

/// Errors from the payment gateway call.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("gateway returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

/// Rejections of user-entered payment details, raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentFormError {
    #[error("amount must be a positive whole number, got '{0}'")]
    InvalidAmount(String),

    #[error("redirect URL is required")]
    MissingRedirectUrl,
}
