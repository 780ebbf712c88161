//! Application state wiring the ports to their adapters.
//!
//! AppState holds the shared instances used by both CLI commands and REST
//! handlers. The core components are generic over their ports; AppState pins
//! them to the type-erased boxes so tests can swap in doubles.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use paychat_core::llm::box_provider::BoxLlmProvider;
use paychat_core::llm::retry::{RetryPolicy, RetryingCompletionClient};
use paychat_core::payment::gateway::BoxPaymentGateway;
use paychat_core::payment::initiator::PaymentInitiator;
use paychat_infra::config::Credentials;
use paychat_infra::llm::create_provider;
use paychat_infra::payment::create_gateway;
use paychat_infra::sqlite::pool::{Database, require_database_url};
use paychat_types::config::AppConfig;
use paychat_types::error::StartupError;

pub type ChatClient = RetryingCompletionClient<BoxLlmProvider>;
pub type Payments = PaymentInitiator<BoxPaymentGateway>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub chat_client: Arc<ChatClient>,
    pub payments: Arc<Payments>,
    pub database: Database,
    /// Root token; cancelled on server shutdown to stop in-flight retries.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Connect to the database and build the HTTP adapters.
    ///
    /// Any failure here is fatal for the process.
    pub async fn init(config: AppConfig, credentials: Credentials) -> Result<Self, StartupError> {
        let url = require_database_url(config.database.url.as_deref())?;
        let database = Database::connect(url).await?;

        let provider = create_provider(&config.chat, credentials.chat_api_key)?;
        let gateway = create_gateway(
            &config.payment,
            credentials.payment_api_user,
            credentials.payment_api_key,
        )?;

        info!(
            model = %config.chat.model,
            max_attempts = config.retry.max_attempts,
            max_backoff_ms = RetryPolicy::from(config.retry).worst_case_wait().as_millis() as u64,
            "application state ready"
        );

        Ok(Self::from_parts(config, provider, gateway, database))
    }

    /// Assemble state from already-built parts.
    pub fn from_parts(
        config: AppConfig,
        provider: BoxLlmProvider,
        gateway: BoxPaymentGateway,
        database: Database,
    ) -> Self {
        let chat_client = RetryingCompletionClient::new(
            provider,
            config.chat.model.clone(),
            RetryPolicy::from(config.retry),
        );

        Self {
            config: Arc::new(config),
            chat_client: Arc::new(chat_client),
            payments: Arc::new(PaymentInitiator::new(gateway)),
            database,
            shutdown: CancellationToken::new(),
        }
    }
}
