//! Error types for the prediction client and the estimate lifecycle.

use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::estimate::RequestStatus;

/// Failure talking to the prediction service.
///
/// The lifecycle treats every variant the same way (status becomes ERROR);
/// the distinction only matters for logs.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Prediction service unavailable: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Prediction service returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Invalid prediction service response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("Request {request_id} completed without a result")]
    MissingResult { request_id: String },

    #[error("Request {request_id} still pending after {attempts} status checks")]
    PollLimitExceeded { request_id: String, attempts: u32 },

    #[error("Invalid prediction service URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("Failed to create HTTP client: {0}")]
    Builder(#[source] reqwest::Error),
}

/// Rejected or failed lifecycle transitions.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Cannot submit while request status is {0}")]
    Busy(RequestStatus),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Invalid name-based form edit.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Unknown form field: {0}")]
    UnknownField(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

pub type ClientResult<T> = Result<T, ClientError>;
