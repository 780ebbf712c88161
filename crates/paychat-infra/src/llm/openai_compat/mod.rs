//! OpenAiChatProvider -- [`LlmProvider`] for OpenAI-compatible chat APIs.
//!
//! Sends the whole transcript to `{base_url}/chat/completions` and returns the
//! first choice. Rate-limit responses (HTTP 429) surface as
//! [`LlmError::RateLimited`] so the retry client can back off; everything
//! else is terminal.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

pub mod types;

use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};

use paychat_core::llm::provider::LlmProvider;
use paychat_types::config::ChatConfig;
use paychat_types::error::StartupError;
use paychat_types::llm::{CompletionRequest, CompletionResponse, LlmError, Message, Usage};

use self::types::{ChatCompletionBody, ChatCompletionReply, ErrorBody, WireMessage};

/// Chat provider for any API speaking the OpenAI chat completions protocol.
pub struct OpenAiChatProvider {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    base_url: String,
}

impl OpenAiChatProvider {
    pub fn new(config: &ChatConfig, api_key: Option<SecretString>) -> Result<Self, StartupError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StartupError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn to_body<'a>(request: &'a CompletionRequest) -> ChatCompletionBody<'a> {
        ChatCompletionBody {
            model: &request.model,
            messages: request
                .messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
        }
    }
}

impl LlmProvider for OpenAiChatProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let Some(api_key) = self.api_key.as_ref() else {
            return Err(LlmError::MissingCredential);
        };

        let response = self
            .client
            .post(self.url())
            .bearer_auth(api_key.expose_secret())
            .json(&Self::to_body(request))
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after_ms = retry_after_ms(response.headers());
            let body = response.text().await.unwrap_or_default();
            return Err(map_status(status, retry_after_ms, &body));
        }

        let reply: ChatCompletionReply = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let content = reply
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.unwrap_or_default())
            .ok_or_else(|| LlmError::Deserialization("response has no choices".to_string()))?;

        Ok(CompletionResponse {
            id: reply.id,
            model: reply.model,
            message: Message::assistant(content),
            usage: reply.usage.map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
            }),
        })
    }
}

fn map_status(status: StatusCode, retry_after_ms: Option<u64>, body: &str) -> LlmError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited { retry_after_ms },
        StatusCode::UNAUTHORIZED => LlmError::AuthenticationFailed,
        _ => {
            let message = serde_json::from_str::<ErrorBody>(body)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| body.to_string());
            LlmError::Provider {
                status: status.as_u16(),
                message,
            }
        }
    }
}

/// `Retry-After` in whole seconds, converted to milliseconds. HTTP-date
/// values are ignored.
fn retry_after_ms(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs.saturating_mul(1000))
}
