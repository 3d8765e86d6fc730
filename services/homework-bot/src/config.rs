//! Configuration types for the homework bot

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::BotError;

/// Environment variable holding the Practicum OAuth token
pub const PRACTICUM_TOKEN_ENV: &str = "PRACTICUM_TOKEN";
/// Environment variable holding the Telegram bot token
pub const TELEGRAM_TOKEN_ENV: &str = "TELEGRAM_TOKEN";
/// Environment variable holding the destination chat id
pub const TELEGRAM_CHAT_ID_ENV: &str = "TELEGRAM_CHAT_ID";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub practicum: PracticumConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Reject values the poll loop cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.polling.retry_interval_seconds == 0 {
            return Err(BotError::FatalConfig(
                "polling.retry_interval_seconds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Practicum homework API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticumConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl PracticumConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for PracticumConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

/// Telegram Bot API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_url: default_telegram_api_url(),
        }
    }
}

/// Poll loop pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_retry_interval")]
    pub retry_interval_seconds: u64,
    /// Move the cursor forward even when the API reports no homework changes.
    #[serde(default)]
    pub advance_cursor_on_empty: bool,
}

impl PollingConfig {
    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_seconds)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            retry_interval_seconds: default_retry_interval(),
            advance_cursor_on_empty: false,
        }
    }
}

/// Log sink settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_file")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
        }
    }
}

fn default_endpoint() -> String {
    "https://practicum.yandex.ru/api/user_api/homework_statuses/".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_retry_interval() -> u64 {
    600
}

fn default_log_file() -> Option<PathBuf> {
    Some(PathBuf::from("homework.log"))
}

/// Secrets required before the poll loop may start
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

impl Credentials {
    /// Check that every secret is present.
    ///
    /// Empty values count as missing. The error names all missing variables.
    pub fn resolve(
        practicum_token: Option<String>,
        telegram_token: Option<String>,
        telegram_chat_id: Option<String>,
    ) -> crate::Result<Self> {
        let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());

        let missing: Vec<&str> = [
            (PRACTICUM_TOKEN_ENV, present(&practicum_token)),
            (TELEGRAM_TOKEN_ENV, present(&telegram_token)),
            (TELEGRAM_CHAT_ID_ENV, present(&telegram_chat_id)),
        ]
        .into_iter()
        .filter(|(_, ok)| !ok)
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(BotError::FatalConfig(format!(
                "Missing required environment variable(s): {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            practicum_token: practicum_token.unwrap_or_default(),
            telegram_token: telegram_token.unwrap_or_default(),
            telegram_chat_id: telegram_chat_id.unwrap_or_default(),
        })
    }
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        BotError::FatalConfig(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content).map_err(|e| {
        BotError::FatalConfig(format!("Failed to parse config file {:?}: {}", path, e))
    })?;
    config.validate()?;
    Ok(config)
}

/// Load `KEY=value` lines from a `.env` file into the process environment.
///
/// With no path, `.env` is searched for from the working directory upwards.
/// Variables already set in the environment are left untouched. A missing
/// file is not an error; the path of the file actually loaded is returned.
pub fn load_env_file(path: Option<&Path>) -> Option<PathBuf> {
    match path {
        Some(path) => dotenvy::from_path(path).ok().map(|_| path.to_path_buf()),
        None => dotenvy::dotenv().ok(),
    }
}
