//! Single-shot payment initiation.
//!
//! No retries: a payment call either produces a link or a generic failure
//! notice. Gateway error detail goes to the log, never to the user.

use std::fmt;

use tracing::{Instrument, info, info_span, warn};

use paychat_types::payment::{PAYMENT_FAILED_NOTICE, PaymentRequest};

use super::gateway::PaymentGateway;

/// What the user is shown after a payment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Confirmed {
        message: String,
        link: Option<String>,
    },
    Failed,
}

impl PaymentOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }

    /// Text suitable for direct display: the confirmation message followed
    /// by the link on its own line, or the generic failure notice.
    pub fn display_text(&self) -> String {
        match self {
            Self::Confirmed {
                message,
                link: Some(link),
            } => format!("{message}\n{link}"),
            Self::Confirmed { message, link: None } => message.clone(),
            Self::Failed => PAYMENT_FAILED_NOTICE.to_string(),
        }
    }
}

impl fmt::Display for PaymentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

pub struct PaymentInitiator<G> {
    gateway: G,
}

impl<G: PaymentGateway> PaymentInitiator<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Send one initiation request to the gateway.
    pub async fn initiate(&self, request: &PaymentRequest) -> PaymentOutcome {
        let span = info_span!(
            "payment.initiate",
            payment.gateway = self.gateway.name(),
            payment.amount = request.amount,
        );

        async {
            match self.gateway.initiate(request).await {
                Ok(response) => {
                    info!(has_link = response.link.is_some(), "payment initiated");
                    PaymentOutcome::Confirmed {
                        message: response.confirmation_text().to_string(),
                        link: response.link,
                    }
                }
                Err(e) => {
                    warn!(error = %e, "payment initiation failed");
                    PaymentOutcome::Failed
                }
            }
        }
        .instrument(span)
        .await
    }
}
