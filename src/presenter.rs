//! Display text for statuses, confidence levels, results and notifications.

use std::borrow::Cow;
use std::fmt;

use crate::domain::{Confidence, PredictionResult, RequestStatus};
use crate::lifecycle::Notification;

pub const CURRENCY: &str = "KM";

const STATUS_LABELS: &[(&str, &str)] = &[
    ("IDLE", "Ready"),
    ("SUBMITTING", "Sending..."),
    ("QUEUED", "Queued..."),
    ("PROCESSING", "Agent is thinking..."),
    ("COMPLETED", "Done"),
    ("ERROR", "Error"),
];

/// Label for a status. Statuses without a label are shown as reported.
pub fn status_label(status: &RequestStatus) -> Cow<'_, str> {
    let code = status.as_str();
    STATUS_LABELS
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, label)| Cow::Borrowed(*label))
        .unwrap_or(Cow::Borrowed(code))
}

pub fn confidence_label(confidence: Confidence) -> &'static str {
    match confidence {
        Confidence::High => "High",
        Confidence::Medium => "Medium",
        Confidence::Low => "Low",
    }
}

/// Text on the submit control for the given status.
pub fn submit_button_label(status: &RequestStatus) -> Cow<'_, str> {
    match status {
        RequestStatus::Idle => Cow::Borrowed("Estimate value"),
        other => status_label(other),
    }
}

pub struct NotificationText {
    pub title: &'static str,
    pub message: &'static str,
}

pub fn notification_text(notification: Notification) -> NotificationText {
    match notification {
        Notification::FeedbackSaved => NotificationText {
            title: "Thanks for the information!",
            message: "The agent learned something new. Retraining has started automatically.",
        },
        Notification::FeedbackFailed => NotificationText {
            title: "Error",
            message: "There was a problem sending the data.",
        },
    }
}

/// Group the integer part with commas and keep at most two decimals.
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return price.to_string();
    }

    let fixed = format!("{:.2}", price.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let frac = frac_part.trim_end_matches('0');
    let sign = if price < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };

    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

/// A completed estimate ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub price: String,
    pub confidence: &'static str,
    pub warnings: Vec<String>,
}

impl From<&PredictionResult> for ResultView {
    fn from(result: &PredictionResult) -> Self {
        Self {
            price: format!("{} {}", CURRENCY, format_price(result.estimated_price)),
            confidence: confidence_label(result.confidence),
            warnings: result.rule_generated_warnings.clone(),
        }
    }
}

impl fmt::Display for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Estimated value: {}", self.price)?;
        write!(f, "Confidence: {}", self.confidence)?;
        if !self.warnings.is_empty() {
            write!(f, "\nNote:")?;
            for warning in &self.warnings {
                write!(f, "\n  - {}", warning)?;
            }
        }
        Ok(())
    }
}
