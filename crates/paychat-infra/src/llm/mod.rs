//! Chat provider implementations.
//!
//! Contains the concrete [`LlmProvider`](paychat_core::llm::provider::LlmProvider)
//! used in production, plus [`create_provider`] which builds it from
//! configuration and credentials.

pub mod openai_compat;

use secrecy::SecretString;

use paychat_core::llm::box_provider::BoxLlmProvider;
use paychat_types::config::ChatConfig;
use paychat_types::error::StartupError;

use self::openai_compat::OpenAiChatProvider;

/// Build the type-erased chat provider from `[chat]` settings.
///
/// A missing API key is not an error here: the provider is still built and
/// reports `MissingCredential` on each call.
pub fn create_provider(
    config: &ChatConfig,
    api_key: Option<SecretString>,
) -> Result<BoxLlmProvider, StartupError> {
    let provider = OpenAiChatProvider::new(config, api_key)?;
    Ok(BoxLlmProvider::new(provider))
}
