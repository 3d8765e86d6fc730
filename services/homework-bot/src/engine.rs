//! Engine: the fetch → validate → format → notify poll loop

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio_util::sync::CancellationToken;

use crate::config::PollingConfig;
use crate::notifier::Notifier;
use crate::practicum::HomeworkApi;
use crate::response::check_response;
use crate::status::parse_status;
use crate::BotError;

/// Prefix of the message sent when a cycle fails
pub const FAILURE_MESSAGE: &str = "Program malfunction";

/// How a single poll cycle ended
#[derive(Debug)]
pub enum CycleOutcome {
    /// A new status message was delivered
    Notified,
    /// The status message matched the last one sent and was suppressed
    Duplicate,
    /// The API reported no homework changes
    NoUpdates,
    /// A stage failed; a failure notice was attempted
    Failed(BotError),
}

/// Polls the homework API and relays status changes to a notifier.
///
/// Owns the cursor and the last delivered message; both live only as long as
/// the process.
pub struct PollLoop {
    api: Arc<dyn HomeworkApi>,
    notifier: Arc<dyn Notifier>,
    interval: Duration,
    advance_cursor_on_empty: bool,
    cursor: i64,
    last_message: Option<String>,
    cancel: CancellationToken,
}

impl std::fmt::Debug for PollLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollLoop")
            .field("cursor", &self.cursor)
            .field("last_message", &self.last_message)
            .field("interval", &self.interval)
            .finish()
    }
}

impl PollLoop {
    pub fn new(
        api: Arc<dyn HomeworkApi>,
        notifier: Arc<dyn Notifier>,
        config: &PollingConfig,
        cursor: i64,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            api,
            notifier,
            interval: config.retry_interval(),
            advance_cursor_on_empty: config.advance_cursor_on_empty,
            cursor,
            last_message: None,
            cancel,
        }
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }

    /// Run cycles until the cancellation token is triggered.
    ///
    /// Every cycle is followed by exactly one sleep of the configured interval.
    pub async fn run(mut self) {
        tracing::info!(
            "Polling every {:?} starting from cursor {}",
            self.interval,
            self.cursor
        );

        loop {
            let outcome = self.run_cycle().await;
            tracing::debug!("Cycle finished: {:?} (cursor={})", outcome, self.cursor);

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = self.cancel.cancelled() => {
                    tracing::debug!("Poll loop cancelled");
                    break;
                }
            }
        }
    }

    /// Run one fetch → validate → format → notify cycle without sleeping
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        match self.check_updates().await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.report_failure(&e).await;
                CycleOutcome::Failed(e)
            }
        }
    }

    async fn check_updates(&mut self) -> crate::Result<CycleOutcome> {
        let response = self.api.fetch(self.cursor).await?;
        let batch = check_response(&response)?;

        let Some(latest) = batch.homeworks.first() else {
            tracing::debug!("No new homework statuses in the response");
            if self.advance_cursor_on_empty {
                self.advance_cursor(batch.current_date);
            }
            return Ok(CycleOutcome::NoUpdates);
        };

        let message = parse_status(latest)?;
        let sent = self.deliver(&message).await?;
        self.advance_cursor(batch.current_date);

        Ok(if sent {
            CycleOutcome::Notified
        } else {
            CycleOutcome::Duplicate
        })
    }

    /// Send `message` unless it equals the last delivered one.
    ///
    /// Returns whether a send happened. The last message is only updated after
    /// the notifier succeeds.
    pub async fn deliver(&mut self, message: &str) -> crate::Result<bool> {
        if self.last_message.as_deref() == Some(message) {
            tracing::debug!("Suppressing duplicate message: \"{}\"", message);
            return Ok(false);
        }

        self.notifier.notify(message).await?;
        tracing::info!(
            "Delivered via '{}': \"{}\"",
            self.notifier.type_name(),
            message
        );
        self.last_message = Some(message.to_string());
        Ok(true)
    }

    async fn report_failure(&mut self, error: &BotError) {
        let message = format!("{}: {}", FAILURE_MESSAGE, error);
        tracing::error!("{} [{}]", message, error.category());

        if let Err(e) = self.deliver(&message).await {
            tracing::warn!("Could not deliver failure notice: {}", e);
        }
    }

    fn advance_cursor(&mut self, current_date: i64) {
        if current_date < self.cursor {
            tracing::warn!(
                "Server current_date {} is behind cursor {}; keeping cursor",
                current_date,
                self.cursor
            );
            return;
        }
        self.cursor = current_date;
    }
}

/// Current Unix time in seconds
pub fn current_epoch_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
