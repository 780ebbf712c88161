//! Validation of user-entered payment details.
//!
//! Both the CLI prompt and the REST handler collect raw strings; this turns
//! them into a [`PaymentRequest`] or rejects them before any network call.

use paychat_types::payment::{PaymentFormError, PaymentRequest};

/// Raw payment details as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct PaymentForm {
    pub amount: String,
    pub redirect_url: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub user_id: Option<String>,
    pub external_id: Option<String>,
    pub message: Option<String>,
}

impl PaymentForm {
    pub fn new(amount: impl Into<String>, redirect_url: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            redirect_url: redirect_url.into(),
            ..Self::default()
        }
    }

    /// Check the form and build the gateway request.
    ///
    /// Text fields are trimmed; optional fields that are blank are dropped.
    pub fn validate(&self) -> Result<PaymentRequest, PaymentFormError> {
        let amount = parse_amount(&self.amount)?;
        let redirect_url = normalize_redirect_url(&self.redirect_url)?;

        Ok(PaymentRequest {
            amount,
            redirect_url,
            name: non_blank(&self.name),
            email: non_blank(&self.email),
            user_id: non_blank(&self.user_id),
            external_id: non_blank(&self.external_id),
            message: non_blank(&self.message),
        })
    }
}

/// Parse a positive whole-number amount.
pub fn parse_amount(raw: &str) -> Result<u64, PaymentFormError> {
    let trimmed = raw.trim();
    match trimmed.parse::<u64>() {
        Ok(amount) if amount > 0 => Ok(amount),
        _ => Err(PaymentFormError::InvalidAmount(trimmed.to_string())),
    }
}

pub fn normalize_redirect_url(raw: &str) -> Result<String, PaymentFormError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PaymentFormError::MissingRedirectUrl);
    }
    Ok(trimmed.to_string())
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
