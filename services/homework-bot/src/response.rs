//! Structural validation of Practicum API responses

use serde_json::Value;

use crate::BotError;

/// Homework records and server time extracted from a valid response
#[derive(Debug, Clone, PartialEq)]
pub struct HomeworkBatch {
    /// Records ordered newest first, as returned by the API
    pub homeworks: Vec<Value>,
    /// Server timestamp to use as the next `from_date`
    pub current_date: i64,
}

/// Validate the shape of a decoded API response
pub fn check_response(response: &Value) -> crate::Result<HomeworkBatch> {
    let body = response.as_object().ok_or_else(|| {
        BotError::MalformedResponse(format!("expected a JSON object, got {}", kind(response)))
    })?;

    if let Some(code) = body.get("code") {
        // Not fatal: the remaining checks still decide whether the cycle fails.
        let message = body.get("message").unwrap_or(&Value::Null);
        tracing::error!(
            "Practicum API rejected the credentials: code={}, message={}",
            code,
            message
        );
    }

    let missing: Vec<&str> = ["homeworks", "current_date"]
        .into_iter()
        .filter(|key| !body.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Err(BotError::MissingFields(format!(
            "response lacks {}",
            missing.join(", ")
        )));
    }

    let homeworks = body["homeworks"].as_array().ok_or_else(|| {
        BotError::MalformedResponse(format!(
            "'homeworks' should be an array, got {}",
            kind(&body["homeworks"])
        ))
    })?;
    let current_date = body["current_date"].as_i64().ok_or_else(|| {
        BotError::MalformedResponse(format!(
            "'current_date' should be an integer, got {}",
            kind(&body["current_date"])
        ))
    })?;

    tracing::debug!(
        "Response carries {} homework record(s), current_date={}",
        homeworks.len(),
        current_date
    );

    Ok(HomeworkBatch {
        homeworks: homeworks.clone(),
        current_date,
    })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
