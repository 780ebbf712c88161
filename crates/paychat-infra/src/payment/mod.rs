//! Payment gateway implementations.

pub mod fapshi;

use secrecy::SecretString;

use paychat_core::payment::gateway::BoxPaymentGateway;
use paychat_types::config::PaymentConfig;
use paychat_types::error::StartupError;

use self::fapshi::FapshiGateway;

/// Build the type-erased payment gateway from `[payment]` settings.
pub fn create_gateway(
    config: &PaymentConfig,
    api_user: Option<SecretString>,
    api_key: Option<SecretString>,
) -> Result<BoxPaymentGateway, StartupError> {
    let gateway = FapshiGateway::new(config, api_user, api_key)?;
    Ok(BoxPaymentGateway::new(gateway))
}
