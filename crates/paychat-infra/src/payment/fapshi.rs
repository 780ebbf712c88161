//! FapshiGateway -- [`PaymentGateway`] for the Fapshi hosted checkout API.
//!
//! One `POST {base_url}/initiate-pay` per call. The merchant credentials go in
//! the `apiuser` / `apikey` headers when configured and are never logged.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use paychat_core::payment::gateway::PaymentGateway;
use paychat_types::config::PaymentConfig;
use paychat_types::error::StartupError;
use paychat_types::payment::{PaymentError, PaymentRequest, PaymentResponse};

pub struct FapshiGateway {
    client: reqwest::Client,
    base_url: String,
    api_user: Option<SecretString>,
    api_key: Option<SecretString>,
}

impl FapshiGateway {
    pub fn new(
        config: &PaymentConfig,
        api_user: Option<SecretString>,
        api_key: Option<SecretString>,
    ) -> Result<Self, StartupError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StartupError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_user,
            api_key,
        })
    }

    fn url(&self) -> String {
        format!("{}/initiate-pay", self.base_url)
    }
}

impl PaymentGateway for FapshiGateway {
    fn name(&self) -> &str {
        "fapshi"
    }

    async fn initiate(&self, request: &PaymentRequest) -> Result<PaymentResponse, PaymentError> {
        let mut builder = self.client.post(self.url()).json(request);
        if let Some(user) = &self.api_user {
            builder = builder.header("apiuser", user.expose_secret());
        }
        if let Some(key) = &self.api_key {
            builder = builder.header("apikey", key.expose_secret());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| PaymentError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "gateway rejected payment");
            return Err(PaymentError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<PaymentResponse>()
            .await
            .map_err(|e| PaymentError::Deserialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway_for(server: &MockServer, with_credentials: bool) -> FapshiGateway {
        let config = PaymentConfig {
            base_url: server.uri(),
            ..PaymentConfig::default()
        };
        let (user, key) = if with_credentials {
            (
                Some(SecretString::from("merchant")),
                Some(SecretString::from("secret-key")),
            )
        } else {
            (None, None)
        };
        FapshiGateway::new(&config, user, key).unwrap()
    }

    #[tokio::test]
    async fn test_initiate_posts_body_with_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/initiate-pay"))
            .and(header("apiuser", "merchant"))
            .and(header("apikey", "secret-key"))
            .and(body_json(serde_json::json!({
                "amount": 5000,
                "redirect_url": "https://example.com",
                "email": "payer@example.com",
                "externalId": "order-7"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "Request successful",
                "link": "https://checkout.fapshi.com/link/123",
                "transId": "123",
                "dateInitiated": "2024-01-01T00:00:00.000Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut request = PaymentRequest::new(5000, "https://example.com");
        request.email = Some("payer@example.com".into());
        request.external_id = Some("order-7".into());

        let response = gateway_for(&server, true).initiate(&request).await.unwrap();

        assert_eq!(response.message.as_deref(), Some("Request successful"));
        assert_eq!(response.link.as_deref(), Some("https://checkout.fapshi.com/link/123"));
        assert_eq!(response.trans_id.as_deref(), Some("123"));
    }

    #[tokio::test]
    async fn test_message_only_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/initiate-pay"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"message": "Payment initiated"})),
            )
            .mount(&server)
            .await;

        let response = gateway_for(&server, false)
            .initiate(&PaymentRequest::new(5000, "https://example.com"))
            .await
            .unwrap();

        assert_eq!(response.confirmation_text(), "Payment initiated");
        assert!(response.link.is_none());
    }

    #[tokio::test]
    async fn test_non_2xx_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"message": "amount must be >= 100"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = gateway_for(&server, true)
            .initiate(&PaymentRequest::new(1, "https://example.com"))
            .await
            .unwrap_err();

        match err {
            PaymentError::Status { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("amount must be"));
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_deserialization_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = gateway_for(&server, true)
            .initiate(&PaymentRequest::new(100, "https://example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::Deserialization(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let config = PaymentConfig {
            base_url: "http://127.0.0.1:1".into(),
            ..PaymentConfig::default()
        };
        let gateway = FapshiGateway::new(&config, None, None).unwrap();

        let err = gateway
            .initiate(&PaymentRequest::new(100, "https://example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::Transport(_)));
    }
}
