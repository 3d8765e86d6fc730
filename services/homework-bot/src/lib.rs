//! Homework bot - Practicum review status notifier
//!
//! Polls the Practicum homework API and relays review status changes to a Telegram chat.

pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod notifier;
pub mod practicum;
pub mod response;
pub mod status;
pub mod telegram;

pub use config::{load_config, Config, Credentials};
pub use error::{BotError, Result};

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::engine::PollLoop;
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::notifier::Notifier;
use crate::practicum::{HomeworkApi, PracticumClient};
use crate::telegram::TelegramNotifier;

/// Run the homework bot until a shutdown signal is received
pub async fn run(config: Config, credentials: Credentials) -> Result<()> {
    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::with_timeout(
        config.practicum.request_timeout(),
    )?);
    let cancel = CancellationToken::new();

    let api: Arc<dyn HomeworkApi> = Arc::new(PracticumClient::new(
        &config.practicum,
        &credentials.practicum_token,
        Arc::clone(&http),
    ));
    let notifier: Arc<dyn Notifier> = Arc::new(TelegramNotifier::new(
        &config.telegram,
        &credentials.telegram_token,
        &credentials.telegram_chat_id,
        Arc::clone(&http),
    ));

    let poll_loop = PollLoop::new(
        api,
        notifier,
        &config.polling,
        engine::current_epoch_secs(),
        cancel.clone(),
    );

    // Setup shutdown handler
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    tracing::info!("Homework bot started");

    // Blocks until cancelled
    poll_loop.run().await;

    tracing::info!("Homework bot stopped");
    Ok(())
}
