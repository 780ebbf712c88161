//! Application configuration types for paychat.
//!
//! `AppConfig` represents the optional `paychat.toml` file. Every field has a
//! default, so an empty file (or no file) yields a working configuration.
//! Credentials are never part of this struct; they come from the environment.

use serde::{Deserialize, Serialize};

use crate::llm::DEFAULT_SYSTEM_PROMPT;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub payment: PaymentConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Chat completion API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Base URL of the OpenAI-compatible API (without `/chat/completions`).
    #[serde(default = "default_chat_base_url")]
    pub base_url: String,
    #[serde(default = "default_chat_model")]
    pub model: String,
    /// System message seeded into every new transcript.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "default_chat_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_chat_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_chat_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_chat_timeout_secs() -> u64 {
    60
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: default_chat_base_url(),
            model: default_chat_model(),
            system_prompt: default_system_prompt(),
            timeout_secs: default_chat_timeout_secs(),
        }
    }
}

/// Payment gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    #[serde(default = "default_payment_base_url")]
    pub base_url: String,
    /// Redirect URL offered when the user does not supply one.
    #[serde(default = "default_redirect_url")]
    pub default_redirect_url: String,
    #[serde(default = "default_payment_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_payment_base_url() -> String {
    "https://live.fapshi.com".to_string()
}

fn default_redirect_url() -> String {
    "https://live.fapshi.com".to_string()
}

fn default_payment_timeout_secs() -> u64 {
    30
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            base_url: default_payment_base_url(),
            default_redirect_url: default_redirect_url(),
            timeout_secs: default_payment_timeout_secs(),
        }
    }
}

/// Rate-limit retry settings for the chat client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts including the first call.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Unit of the backoff; retry `n` waits `base_delay_ms * 2^n`.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    5
}

fn default_base_delay_ms() -> u64 {
    1000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

/// Database bootstrap settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string; `DATABASE_URL` overrides it.
    #[serde(default)]
    pub url: Option<String>,
}
