//! Axum router configuration with middleware.
//!
//! API routes live under `/api/v1/`; `/health` is also served at the root
//! for load balancers. Middleware: CORS, request tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/chat/completions", post(handlers::chat::complete_chat))
        .route("/payments", post(handlers::payment::initiate_payment))
        .route("/health", get(handlers::health::health_check));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(handlers::health::health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use paychat_core::llm::box_provider::BoxLlmProvider;
    use paychat_core::llm::provider::LlmProvider;
    use paychat_core::payment::gateway::{BoxPaymentGateway, PaymentGateway};
    use paychat_infra::sqlite::pool::Database;
    use paychat_types::config::{AppConfig, RetryConfig};
    use paychat_types::llm::{CompletionRequest, CompletionResponse, LlmError, Message};
    use paychat_types::payment::{
        PAYMENT_FAILED_NOTICE, PaymentError, PaymentRequest, PaymentResponse,
    };

    use super::*;

    enum Reply {
        Text(&'static str),
        RateLimited,
        Failure,
    }

    #[derive(Clone)]
    struct StubProvider {
        reply: Arc<Reply>,
        calls: Arc<AtomicU32>,
        last_request: Arc<Mutex<Option<CompletionRequest>>>,
    }

    impl StubProvider {
        fn new(reply: Reply) -> Self {
            Self {
                reply: Arc::new(reply),
                calls: Arc::new(AtomicU32::new(0)),
                last_request: Arc::new(Mutex::new(None)),
            }
        }
    }

    impl LlmProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            match self.reply.as_ref() {
                Reply::Text(text) => Ok(CompletionResponse {
                    id: None,
                    model: None,
                    message: Message::assistant(*text),
                    usage: None,
                }),
                Reply::RateLimited => Err(LlmError::RateLimited {
                    retry_after_ms: None,
                }),
                Reply::Failure => Err(LlmError::Provider {
                    status: 500,
                    message: "secret upstream detail".into(),
                }),
            }
        }
    }

    #[derive(Clone)]
    struct StubGateway {
        replies: Arc<Mutex<VecDeque<Result<PaymentResponse, PaymentError>>>>,
        seen: Arc<Mutex<Vec<PaymentRequest>>>,
    }

    impl StubGateway {
        fn new(replies: Vec<Result<PaymentResponse, PaymentError>>) -> Self {
            Self {
                replies: Arc::new(Mutex::new(replies.into())),
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl PaymentGateway for StubGateway {
        fn name(&self) -> &str {
            "stub"
        }

        async fn initiate(&self, request: &PaymentRequest) -> Result<PaymentResponse, PaymentError> {
            self.seen.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(PaymentError::Transport("no reply scripted".into())))
        }
    }

    async fn state_with(provider: StubProvider, gateway: StubGateway) -> AppState {
        let config = AppConfig {
            retry: RetryConfig {
                max_attempts: 5,
                base_delay_ms: 1,
            },
            ..AppConfig::default()
        };
        let database = Database::connect("sqlite::memory:").await.unwrap();
        AppState::from_parts(
            config,
            BoxLlmProvider::new(provider),
            BoxPaymentGateway::new(gateway),
            database,
        )
    }

    async fn post_json(router: Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn transcript_body(user: &str) -> serde_json::Value {
        serde_json::json!({
            "messages": [
                {"role": "system", "content": "Hello! How can I help you today?"},
                {"role": "user", "content": user}
            ]
        })
    }

    #[tokio::test]
    async fn chat_completion_returns_assistant_message() {
        let provider = StubProvider::new(Reply::Text("4"));
        let state = state_with(provider.clone(), StubGateway::new(vec![])).await;

        let (status, body) = post_json(
            build_router(state),
            "/api/v1/chat/completions",
            transcript_body("What is 2+2?"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["message"]["role"], "assistant");
        assert_eq!(body["data"]["message"]["content"], "4");
        assert!(body["meta"]["request_id"].is_string());
        let sent = provider.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(sent.model, "gpt-3.5-turbo");
        assert_eq!(sent.messages.len(), 2);
    }

    #[tokio::test]
    async fn chat_rate_limit_exhaustion_is_429() {
        let provider = StubProvider::new(Reply::RateLimited);
        let state = state_with(provider.clone(), StubGateway::new(vec![])).await;

        let (status, body) = post_json(
            build_router(state),
            "/api/v1/chat/completions",
            transcript_body("hi"),
        )
        .await;

        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["errors"][0]["code"], "RATE_LIMIT_EXHAUSTED");
        assert_eq!(
            body["errors"][0]["message"],
            "Rate limit exceeded. Please try again later."
        );
        assert_eq!(provider.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn chat_failure_is_502_without_detail() {
        let provider = StubProvider::new(Reply::Failure);
        let state = state_with(provider.clone(), StubGateway::new(vec![])).await;

        let (status, body) = post_json(
            build_router(state),
            "/api/v1/chat/completions",
            transcript_body("hi"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["errors"][0]["code"], "REQUEST_FAILED");
        assert!(!body.to_string().contains("secret upstream detail"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn chat_after_shutdown_is_503() {
        let provider = StubProvider::new(Reply::Text("4"));
        let state = state_with(provider.clone(), StubGateway::new(vec![])).await;
        state.shutdown.cancel();

        let (status, body) = post_json(
            build_router(state),
            "/api/v1/chat/completions",
            transcript_body("hi"),
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["errors"][0]["code"], "CANCELLED");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn chat_transcript_not_ending_in_user_is_400() {
        let provider = StubProvider::new(Reply::Text("4"));
        let state = state_with(provider.clone(), StubGateway::new(vec![])).await;

        let (status, body) = post_json(
            build_router(state),
            "/api/v1/chat/completions",
            serde_json::json!({"messages": [{"role": "system", "content": "hi"}]}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn chat_blank_user_message_is_400() {
        let provider = StubProvider::new(Reply::Text("4"));
        let state = state_with(provider.clone(), StubGateway::new(vec![])).await;

        let (status, _) = post_json(
            build_router(state),
            "/api/v1/chat/completions",
            transcript_body("   "),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn chat_malformed_json_is_envelope_400() {
        let state = state_with(StubProvider::new(Reply::Text("4")), StubGateway::new(vec![])).await;

        let (status, body) = post_json(
            build_router(state),
            "/api/v1/chat/completions",
            serde_json::json!({"msgs": []}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn payment_success_returns_message_and_link() {
        let gateway = StubGateway::new(vec![Ok(PaymentResponse {
            message: Some("Payment initiated".into()),
            link: Some("https://checkout.example/abc".into()),
            ..PaymentResponse::default()
        })]);
        let state = state_with(StubProvider::new(Reply::Text("")), gateway.clone()).await;

        let (status, body) = post_json(
            build_router(state),
            "/api/v1/payments",
            serde_json::json!({"amount": "5000", "redirect_url": "https://example.com"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["message"], "Payment initiated");
        assert_eq!(body["data"]["link"], "https://checkout.example/abc");
        let seen = gateway.seen.lock().unwrap();
        assert_eq!(seen[0].amount, 5000);
        assert_eq!(seen[0].redirect_url, "https://example.com");
    }

    #[tokio::test]
    async fn payment_uses_default_redirect_when_omitted() {
        let gateway = StubGateway::new(vec![Ok(PaymentResponse::default())]);
        let state = state_with(StubProvider::new(Reply::Text("")), gateway.clone()).await;

        let (status, body) = post_json(
            build_router(state),
            "/api/v1/payments",
            serde_json::json!({"amount": 100, "externalId": "order-1"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["message"], "Payment initiation successful.");
        assert!(body["data"].get("link").is_none());
        let seen = gateway.seen.lock().unwrap();
        assert_eq!(seen[0].redirect_url, "https://live.fapshi.com");
        assert_eq!(seen[0].external_id.as_deref(), Some("order-1"));
    }

    #[tokio::test]
    async fn payment_gateway_failure_is_502_generic() {
        let gateway = StubGateway::new(vec![Err(PaymentError::Status {
            status: 401,
            body: "bad apikey".into(),
        })]);
        let state = state_with(StubProvider::new(Reply::Text("")), gateway).await;

        let (status, body) = post_json(
            build_router(state),
            "/api/v1/payments",
            serde_json::json!({"amount": 100, "redirect_url": "https://example.com"}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["errors"][0]["code"], "PAYMENT_FAILED");
        assert_eq!(body["errors"][0]["message"], PAYMENT_FAILED_NOTICE);
        assert!(!body.to_string().contains("bad apikey"));
    }

    #[tokio::test]
    async fn payment_invalid_amount_is_400_without_gateway_call() {
        let gateway = StubGateway::new(vec![]);
        let state = state_with(StubProvider::new(Reply::Text("")), gateway.clone()).await;

        let (status, body) = post_json(
            build_router(state),
            "/api/v1/payments",
            serde_json::json!({"amount": "-5", "redirect_url": "https://example.com"}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");
        assert!(gateway.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let state = state_with(StubProvider::new(Reply::Text("")), StubGateway::new(vec![])).await;

        for uri in ["/health", "/api/v1/health"] {
            let response = build_router(state.clone())
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(body["status"], "ok");
            assert_eq!(body["database"], "ok");
        }
    }
}
