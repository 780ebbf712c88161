//! Payment initiation handler.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use paychat_core::payment::form::PaymentForm;
use paychat_core::payment::initiator::PaymentOutcome;

use crate::http::error::{AppError, RequestError};
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// Form fields as posted by a browser. `amount` may be a JSON number or a
/// numeric string.
#[derive(Debug, Deserialize)]
pub struct InitiatePaymentBody {
    pub amount: serde_json::Value,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "userId")]
    pub user_id: Option<String>,
    #[serde(default, alias = "externalId")]
    pub external_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaymentData {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// POST /api/v1/payments - Initiate a payment (single attempt).
pub async fn initiate_payment(
    State(state): State<AppState>,
    body: Result<Json<InitiatePaymentBody>, JsonRejection>,
) -> Result<Json<ApiResponse<PaymentData>>, RequestError> {
    let timer = RequestTimer::start();
    match run_payment(&state, body).await {
        Ok(data) => Ok(Json(timer.success(data))),
        Err(e) => Err(timer.fail(e)),
    }
}

async fn run_payment(
    state: &AppState,
    body: Result<Json<InitiatePaymentBody>, JsonRejection>,
) -> Result<PaymentData, AppError> {
    let Json(body) = body?;

    let form = PaymentForm {
        amount: amount_text(&body.amount)?,
        redirect_url: body
            .redirect_url
            .unwrap_or_else(|| state.config.payment.default_redirect_url.clone()),
        name: body.name,
        email: body.email,
        user_id: body.user_id,
        external_id: body.external_id,
        message: body.message,
    };
    let request = form.validate()?;

    match state.payments.initiate(&request).await {
        PaymentOutcome::Confirmed { message, link } => Ok(PaymentData { message, link }),
        PaymentOutcome::Failed => Err(AppError::PaymentFailed),
    }
}

fn amount_text(value: &serde_json::Value) -> Result<String, AppError> {
    match value {
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::String(s) => Ok(s.clone()),
        _ => Err(AppError::Validation(
            "amount must be a number or a numeric string".to_string(),
        )),
    }
}
