//! Client for the housing prediction service.
//!
//! Provides type-safe methods for:
//! - Submitting a prediction request
//! - Checking request status
//! - Submitting sold-price feedback

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument};

use crate::domain::{FeedbackPayload, PredictAccepted, RequestPayload, StatusResponse};
use crate::error::{ClientError, ClientResult};

/// Operations the estimate lifecycle needs from the prediction service.
#[async_trait]
pub trait PredictionApi: Send + Sync {
    /// Queue a prediction request, returning its request id.
    async fn submit_prediction(&self, payload: &RequestPayload) -> ClientResult<String>;

    async fn check_status(&self, request_id: &str) -> ClientResult<StatusResponse>;

    async fn submit_feedback(&self, feedback: &FeedbackPayload) -> ClientResult<()>;
}

/// HTTP client for the prediction service.
#[derive(Clone)]
pub struct PredictionClient {
    client: Client,
    base_url: String,
}

/// Error body returned by the service.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl PredictionClient {
    /// Create a new prediction service client.
    pub fn new(base_url: &str, timeout_seconds: u64) -> ClientResult<Self> {
        url::Url::parse(base_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(ClientError::Builder)?;

        tracing::info!(base_url = base_url, "Prediction client initialized");

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> ClientResult<Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Prediction service request");

        let response = self.client.post(&url).json(body).send().await.map_err(|e| {
            error!(error = %e, "Prediction service request failed");
            ClientError::Transport(e)
        })?;

        Self::check(response).await
    }

    async fn get(&self, path: &str) -> ClientResult<Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Prediction service request");

        let response = self.client.get(&url).send().await.map_err(|e| {
            error!(error = %e, "Prediction service request failed");
            ClientError::Transport(e)
        })?;

        Self::check(response).await
    }

    /// Turn non-success statuses into errors, keeping the service's detail message.
    async fn check(response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .map(|body| match body.detail {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .unwrap_or_else(|| format!("Prediction service error: {}", status));

        error!(status = %status, message = %message, "Prediction service error");
        Err(ClientError::Status { status, message })
    }

    async fn decode<R: DeserializeOwned>(response: Response) -> ClientResult<R> {
        response.json::<R>().await.map_err(|e| {
            error!(error = %e, "Failed to parse prediction service response");
            ClientError::Decode(e)
        })
    }
}

#[async_trait]
impl PredictionApi for PredictionClient {
    #[instrument(skip(self, payload))]
    async fn submit_prediction(&self, payload: &RequestPayload) -> ClientResult<String> {
        let response = self.post("/predict", payload).await?;
        let accepted: PredictAccepted = Self::decode(response).await?;

        debug!(
            request_id = %accepted.request_id,
            status = ?accepted.status,
            "Prediction request accepted"
        );

        Ok(accepted.request_id)
    }

    #[instrument(skip(self))]
    async fn check_status(&self, request_id: &str) -> ClientResult<StatusResponse> {
        let response = self.get(&format!("/status/{}", request_id)).await?;
        Self::decode(response).await
    }

    #[instrument(skip(self, feedback), fields(request_id = %feedback.request_id))]
    async fn submit_feedback(&self, feedback: &FeedbackPayload) -> ClientResult<()> {
        // Acknowledgement body is not used
        self.post("/feedback", feedback).await?;
        Ok(())
    }
}
