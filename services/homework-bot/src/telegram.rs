//! Telegram Bot API notification client

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::TelegramConfig;
use crate::io::HttpClient;
use crate::notifier::Notifier;
use crate::BotError;

/// Sends messages to a single Telegram chat
pub struct TelegramNotifier {
    send_url: String,
    chat_id: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl TelegramNotifier {
    pub fn new(
        config: &TelegramConfig,
        token: &str,
        chat_id: &str,
        http: Arc<dyn HttpClient>,
    ) -> Self {
        let api_url = config.api_url.trim_end_matches('/');
        tracing::debug!("Created TelegramNotifier for chat {}", chat_id);

        Self {
            send_url: format!("{}/bot{}/sendMessage", api_url, token),
            chat_id: chat_id.to_string(),
            http,
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn type_name(&self) -> &str {
        "telegram"
    }

    async fn notify(&self, message: &str) -> crate::Result<()> {
        let params = [("chat_id", self.chat_id.as_str()), ("text", message)];

        tracing::debug!("Sending Telegram message to chat {}", self.chat_id);

        let response = self
            .http
            .post_form(&self.send_url, &params)
            .await
            .map_err(|e| BotError::DeliveryFailed(e.to_string()))?;

        if response.status != 200 {
            return Err(BotError::DeliveryFailed(format!(
                "Telegram API returned status {}: {}",
                response.status, response.body
            )));
        }

        tracing::info!("Message sent to chat {}: \"{}\"", self.chat_id, message);
        Ok(())
    }
}
