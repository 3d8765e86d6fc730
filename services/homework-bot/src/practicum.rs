//! Practicum homework-status API client

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::PracticumConfig;
use crate::io::HttpClient;
use crate::BotError;

/// Source of homework status responses
#[async_trait]
pub trait HomeworkApi: Send + Sync + std::fmt::Debug {
    /// Fetch statuses changed since `from_date` (Unix seconds)
    async fn fetch(&self, from_date: i64) -> crate::Result<Value>;
}

/// Client for the Practicum `homework_statuses` endpoint
pub struct PracticumClient {
    endpoint: String,
    authorization: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl PracticumClient {
    pub fn new(config: &PracticumConfig, token: &str, http: Arc<dyn HttpClient>) -> Self {
        tracing::debug!("Created PracticumClient for {}", config.endpoint);

        Self {
            endpoint: config.endpoint.clone(),
            authorization: format!("OAuth {}", token),
            http,
        }
    }
}

#[async_trait]
impl HomeworkApi for PracticumClient {
    async fn fetch(&self, from_date: i64) -> crate::Result<Value> {
        let from_date = from_date.to_string();
        tracing::debug!("Requesting homework statuses from_date={}", from_date);

        let response = self
            .http
            .get(
                &self.endpoint,
                &[("Authorization", self.authorization.as_str())],
                &[("from_date", from_date.as_str())],
            )
            .await?;

        if response.status != 200 {
            return Err(BotError::UnexpectedStatus {
                endpoint: self.endpoint.clone(),
                status: response.status,
            });
        }

        serde_json::from_str(&response.body).map_err(|e| {
            BotError::MalformedResponse(format!("response body is not valid JSON: {}", e))
        })
    }
}
