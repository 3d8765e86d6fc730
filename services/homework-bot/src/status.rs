//! Homework review statuses and the messages they map to

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::BotError;

/// Review status reported by the Practicum API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub const ALL: [HomeworkStatus; 3] = [
        HomeworkStatus::Approved,
        HomeworkStatus::Reviewing,
        HomeworkStatus::Rejected,
    ];

    /// Wire code used by the API
    pub fn code(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        }
    }

    /// Human-readable verdict sent to the user
    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for HomeworkStatus {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HomeworkStatus::ALL
            .into_iter()
            .find(|status| status.code() == s)
            .ok_or_else(|| BotError::UnknownStatus(s.to_string()))
    }
}

/// Build the notification text for a single homework record
pub fn parse_status(homework: &Value) -> crate::Result<String> {
    let record = homework.as_object().ok_or_else(|| {
        BotError::MalformedResponse(format!("homework record is not an object: {}", homework))
    })?;

    let missing: Vec<&str> = ["homework_name", "status"]
        .into_iter()
        .filter(|key| !record.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Err(BotError::MissingFields(format!(
            "homework record lacks {}",
            missing.join(", ")
        )));
    }

    let name = match &record["homework_name"] {
        Value::String(name) => name.clone(),
        other => other.to_string(),
    };
    let status: HomeworkStatus = match &record["status"] {
        Value::String(code) => code.parse()?,
        other => return Err(BotError::UnknownStatus(other.to_string())),
    };

    Ok(format!(
        "Changed review status for \"{}\". {}",
        name,
        status.verdict()
    ))
}
