//! BDD test world for the homework bot

use std::collections::VecDeque;
use std::sync::Arc;

use cucumber::World;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use homework_bot::config::PollingConfig;
use homework_bot::engine::{CycleOutcome, PollLoop};
use homework_bot::notifier::Notifier;
use homework_bot::practicum::HomeworkApi;
use homework_bot::response::HomeworkBatch;
use homework_bot::BotError;

/// Homework API double that replays queued responses
#[derive(Debug, Default)]
pub struct ScriptedApi {
    pub responses: Mutex<VecDeque<homework_bot::Result<Value>>>,
    pub requested: Mutex<Vec<i64>>,
}

#[async_trait::async_trait]
impl HomeworkApi for ScriptedApi {
    async fn fetch(&self, from_date: i64) -> homework_bot::Result<Value> {
        self.requested.lock().await.push(from_date);
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(BotError::Unreachable("no scripted response".to_string())))
    }
}

/// Notifier double that records delivered messages
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub fail: bool,
    pub sent: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    fn type_name(&self) -> &str {
        "recording"
    }

    async fn notify(&self, message: &str) -> homework_bot::Result<()> {
        if self.fail {
            return Err(BotError::DeliveryFailed("chat unavailable".to_string()));
        }
        self.sent.lock().await.push(message.to_string());
        Ok(())
    }
}

#[derive(Debug, Default, World)]
pub struct HomeworkWorld {
    // Validation and formatting
    pub response: Option<Value>,
    pub record: Option<Value>,
    pub validation_result: Option<homework_bot::Result<HomeworkBatch>>,
    pub format_result: Option<homework_bot::Result<String>>,

    // Poll loop
    pub start_cursor: i64,
    pub advance_cursor_on_empty: bool,
    pub api: Arc<ScriptedApi>,
    pub notifier: Option<Arc<RecordingNotifier>>,
    pub poll_loop: Option<PollLoop>,
    pub outcomes: Vec<CycleOutcome>,

    // Telegram
    pub telegram: Option<Box<dyn Notifier>>,
    pub delivery_result: Option<homework_bot::Result<()>>,
}

impl HomeworkWorld {
    pub fn notifier(&mut self) -> Arc<RecordingNotifier> {
        Arc::clone(
            self.notifier
                .get_or_insert_with(|| Arc::new(RecordingNotifier::default())),
        )
    }

    /// Build the poll loop on first use so Given steps can configure it
    pub fn poll_loop(&mut self) -> &mut PollLoop {
        if self.poll_loop.is_none() {
            let config = PollingConfig {
                advance_cursor_on_empty: self.advance_cursor_on_empty,
                ..Default::default()
            };
            let notifier = self.notifier();
            let api = Arc::clone(&self.api);
            self.poll_loop = Some(PollLoop::new(
                api,
                notifier,
                &config,
                self.start_cursor,
                CancellationToken::new(),
            ));
        }
        self.poll_loop.as_mut().expect("poll loop just built")
    }
}

/// Name of the error variant, as written in feature files
pub fn variant_name(err: &BotError) -> &'static str {
    match err {
        BotError::MalformedResponse(_) => "MalformedResponse",
        BotError::MissingFields(_) => "MissingFields",
        BotError::UnknownStatus(_) => "UnknownStatus",
        BotError::Unreachable(_) => "Unreachable",
        BotError::UnexpectedStatus { .. } => "UnexpectedStatus",
        BotError::DeliveryFailed(_) => "DeliveryFailed",
        BotError::FatalConfig(_) => "FatalConfig",
    }
}
