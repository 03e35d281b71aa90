//! JSON bodies exchanged with the questionnaire backend.

use chrono::{DateTime, NaiveDate, Utc};
use intake_types::{NormalizedAnswers, UserInfo};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Path of the submission endpoint, relative to the API base URL.
pub const SUBMIT_PATH: &str = "/api/questionnaire/submit";

/// Body of `POST /api/questionnaire/submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub date_of_birth: NaiveDate,
    pub occupation: String,
    /// The backend stores the state of residence as the address.
    pub address: String,
    pub marital_status: String,
    pub dependants_count: u32,
    pub answers: NormalizedAnswers,
}

impl SubmitRequest {
    /// Combine personal details with normalized answers.
    pub fn new(user: &UserInfo, answers: NormalizedAnswers) -> Self {
        Self {
            full_name: user.full_name.trim().to_string(),
            email: user.email.trim().to_string(),
            phone: user.phone.trim().to_string(),
            gender: user.gender.as_str().to_string(),
            date_of_birth: user.date_of_birth,
            occupation: user.occupation.trim().to_string(),
            address: user.state_of_residence.trim().to_string(),
            marital_status: user.marital_status.as_str().to_string(),
            dependants_count: 0,
            answers,
        }
    }
}

/// The `submission` part of a successful response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionMeta {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Suggested allocation, in percent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth: Option<f64>,
}

/// The backend's profile of the respondent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub net_worth: f64,
    pub net_worth_band: String,
    pub risk_score: f64,
    pub risk_profile: String,
    pub persona: String,
    #[serde(default)]
    pub portfolio: Portfolio,
    pub narrative: String,
}

/// A successful submission: what was stored and how it was analysed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub submission: SubmissionMeta,
    pub analysis: Analysis,
}

/// Parse the receipt from a success body, wrapped in `{ data: ... }` or bare.
pub fn parse_receipt(body: &str) -> Option<SubmissionReceipt> {
    let value: Value = serde_json::from_str(body).ok()?;
    let payload = match value.get("data") {
        Some(data) if data.is_object() => data.clone(),
        _ => value,
    };
    serde_json::from_value(payload).ok()
}

/// The human-readable message of an error body.
///
/// JSON bodies yield their `message` or `error` field; anything else is taken
/// as the message text. Blank messages yield `None`.
pub fn error_message(body: &str) -> Option<String> {
    let message = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(fields)) => ["message", "error"]
            .iter()
            .filter_map(|key| fields.get(*key).and_then(Value::as_str))
            .find(|text| !text.trim().is_empty())
            .map(str::to_string),
        Ok(Value::String(text)) => Some(text),
        Ok(_) => None,
        Err(_) => Some(body.to_string()),
    };
    message
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
