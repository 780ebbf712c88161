//! Configuration loader for paychat.
//!
//! Non-secret settings come from an optional `paychat.toml`, then the
//! environment overrides a handful of them. Credentials only ever come from
//! the environment (optionally populated from `.env`).

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use paychat_types::config::AppConfig;

/// File name looked up in the working directory and the user config dir.
pub const CONFIG_FILE_NAME: &str = "paychat.toml";

pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_CHAT_MODEL: &str = "PAYCHAT_CHAT_MODEL";
pub const ENV_CHAT_BASE_URL: &str = "PAYCHAT_CHAT_BASE_URL";
pub const ENV_PAYMENT_BASE_URL: &str = "PAYCHAT_PAYMENT_BASE_URL";
pub const ENV_CHAT_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_PAYMENT_API_USER: &str = "FAPSHI_API_USER";
pub const ENV_PAYMENT_API_KEY: &str = "FAPSHI_API_KEY";

/// Load `.env` from the working directory (or a parent) into the process
/// environment. Returns the path that was loaded, if any.
///
/// Called before tracing is initialised, so the caller logs the result.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Pick the config file to read.
///
/// An explicit path is used as given. Otherwise `./paychat.toml`, then
/// `{config_dir}/paychat/paychat.toml`; the first that exists wins.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("paychat").join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file())
}

/// Load [`AppConfig`] from `path`.
///
/// - `None` or a missing file gives [`AppConfig::default()`].
/// - A file that fails to read or parse logs a warning and gives the default.
pub async fn load_app_config(path: Option<&Path>) -> AppConfig {
    let Some(path) = path else {
        tracing::debug!("no config file, using defaults");
        return AppConfig::default();
    };

    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            AppConfig::default()
        }
    }
}

/// Apply environment overrides using `lookup` (normally `std::env::var`).
///
/// Blank values are ignored.
pub fn apply_env_overrides<F>(mut config: AppConfig, lookup: F) -> AppConfig
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = get(ENV_DATABASE_URL) {
        config.database.url = Some(url);
    }
    if let Some(model) = get(ENV_CHAT_MODEL) {
        config.chat.model = model;
    }
    if let Some(base_url) = get(ENV_CHAT_BASE_URL) {
        config.chat.base_url = base_url;
    }
    if let Some(base_url) = get(ENV_PAYMENT_BASE_URL) {
        config.payment.base_url = base_url;
    }
    config
}

/// Process environment lookup for [`apply_env_overrides`] and
/// [`Credentials::from_lookup`].
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// API credentials. Each is optional; a missing chat key surfaces as a
/// request failure, missing payment credentials are simply not sent.
#[derive(Default)]
pub struct Credentials {
    pub chat_api_key: Option<SecretString>,
    pub payment_api_user: Option<SecretString>,
    pub payment_api_key: Option<SecretString>,
}

impl Credentials {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(SecretString::from)
        };

        Self {
            chat_api_key: secret(ENV_CHAT_API_KEY),
            payment_api_user: secret(ENV_PAYMENT_API_USER),
            payment_api_key: secret(ENV_PAYMENT_API_KEY),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("chat_api_key", &self.chat_api_key.is_some())
            .field("payment_api_user", &self.payment_api_user.is_some())
            .field("payment_api_key", &self.payment_api_key.is_some())
            .finish()
    }
}
