//! Prediction service models.
//!
//! These mirror the JSON bodies exchanged with the prediction service.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::number::serialize_number;

/// Lifecycle status of a prediction request.
///
/// The service may report statuses this client does not know about; those
/// are kept verbatim in [`RequestStatus::Other`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequestStatus {
    #[default]
    Idle,
    Submitting,
    Queued,
    Processing,
    Completed,
    Error,
    Other(String),
}

impl RequestStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RequestStatus::Idle => "IDLE",
            RequestStatus::Submitting => "SUBMITTING",
            RequestStatus::Queued => "QUEUED",
            RequestStatus::Processing => "PROCESSING",
            RequestStatus::Completed => "COMPLETED",
            RequestStatus::Error => "ERROR",
            RequestStatus::Other(s) => s,
        }
    }

    /// No further transitions happen without user action.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Completed | RequestStatus::Error)
    }

    /// A request has been sent and has not finished yet.
    pub fn is_in_flight(&self) -> bool {
        !matches!(
            self,
            RequestStatus::Idle | RequestStatus::Completed | RequestStatus::Error
        )
    }
}

impl From<String> for RequestStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "IDLE" => RequestStatus::Idle,
            "SUBMITTING" => RequestStatus::Submitting,
            "QUEUED" => RequestStatus::Queued,
            "PROCESSING" => RequestStatus::Processing,
            "COMPLETED" => RequestStatus::Completed,
            "ERROR" => RequestStatus::Error,
            _ => RequestStatus::Other(s),
        }
    }
}

impl From<&str> for RequestStatus {
    fn from(s: &str) -> Self {
        RequestStatus::from(s.to_string())
    }
}

impl From<RequestStatus> for String {
    fn from(status: RequestStatus) -> Self {
        match status {
            RequestStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How certain the service is about an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Completed estimate for a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub request_id: String,
    pub estimated_price: f64,
    pub confidence: Confidence,
    #[serde(default)]
    pub rule_generated_warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<NaiveDateTime>,
}

/// Response to `POST /predict`.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictAccepted {
    pub request_id: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<RequestStatus>,
}

/// Response to `GET /status/{request_id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusResponse {
    pub status: RequestStatus,
    #[serde(default)]
    pub result: Option<PredictionResult>,
}

/// Body of `POST /feedback`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackPayload {
    pub request_id: String,
    #[serde(serialize_with = "serialize_number")]
    pub actual_price: f64,
}
