//! BDD step definitions for Telegram delivery

use std::sync::Arc;

use cucumber::{given, then, when};

use homework_bot::config::TelegramConfig;
use homework_bot::io::{HttpClient, HttpResponse};
use homework_bot::telegram::TelegramNotifier;
use homework_bot::BotError;

use crate::world::{variant_name, HomeworkWorld};

const BOT_TOKEN: &str = "123:test-token";

/// Telegram API double answering every request with a fixed status
struct FixedStatusClient {
    status: u16,
    body: &'static str,
}

#[async_trait::async_trait]
impl HttpClient for FixedStatusClient {
    async fn get(
        &self,
        _url: &str,
        _headers: &[(&str, &str)],
        _query: &[(&str, &str)],
    ) -> homework_bot::Result<HttpResponse> {
        Ok(HttpResponse {
            status: self.status,
            body: self.body.to_string(),
        })
    }

    async fn post_form(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> homework_bot::Result<HttpResponse> {
        assert!(url.ends_with(&format!("/bot{}/sendMessage", BOT_TOKEN)), "{url}");
        assert!(params.iter().any(|(k, _)| *k == "chat_id"));
        assert!(params.iter().any(|(k, _)| *k == "text"));
        Ok(HttpResponse {
            status: self.status,
            body: self.body.to_string(),
        })
    }
}

/// Telegram API double simulating a network failure
struct UnreachableClient;

#[async_trait::async_trait]
impl HttpClient for UnreachableClient {
    async fn get(
        &self,
        _url: &str,
        _headers: &[(&str, &str)],
        _query: &[(&str, &str)],
    ) -> homework_bot::Result<HttpResponse> {
        Err(BotError::Unreachable("connection refused".to_string()))
    }

    async fn post_form(
        &self,
        _url: &str,
        _params: &[(&str, &str)],
    ) -> homework_bot::Result<HttpResponse> {
        Err(BotError::Unreachable("connection refused".to_string()))
    }
}

fn telegram_notifier(http: Arc<dyn HttpClient>) -> TelegramNotifier {
    TelegramNotifier::new(&TelegramConfig::default(), BOT_TOKEN, "42", http)
}

#[given("a Telegram notifier with a healthy API")]
fn telegram_healthy(world: &mut HomeworkWorld) {
    let http = Arc::new(FixedStatusClient {
        status: 200,
        body: r#"{"ok":true}"#,
    });
    world.telegram = Some(Box::new(telegram_notifier(http)));
}

#[given("a Telegram notifier whose API rejects the message")]
fn telegram_rejects(world: &mut HomeworkWorld) {
    let http = Arc::new(FixedStatusClient {
        status: 403,
        body: r#"{"ok":false,"description":"Forbidden: bot was blocked by the user"}"#,
    });
    world.telegram = Some(Box::new(telegram_notifier(http)));
}

#[given("a Telegram notifier whose API is unreachable")]
fn telegram_unreachable(world: &mut HomeworkWorld) {
    world.telegram = Some(Box::new(telegram_notifier(Arc::new(UnreachableClient))));
}

#[when(expr = "the message {string} is sent")]
async fn send_message(world: &mut HomeworkWorld, message: String) {
    let notifier = world.telegram.as_ref().expect("notifier not set");
    world.delivery_result = Some(notifier.notify(&message).await);
}

#[then("the delivery should succeed")]
fn delivery_succeeds(world: &mut HomeworkWorld) {
    let result = world.delivery_result.as_ref().expect("no result");
    tokio_test::assert_ok!(result);
}

#[then(expr = "the delivery should fail with {word}")]
fn delivery_fails(world: &mut HomeworkWorld, variant: String) {
    let result = world.delivery_result.as_ref().expect("no result");
    let err = tokio_test::assert_err!(result);
    assert_eq!(variant_name(err), variant, "got {err:?}");
}
