//! Status polling for a queued prediction request.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use super::controller::Shared;
use super::state::{Generation, PollStep};
use crate::domain::RequestStatus;
use crate::error::ClientError;
use crate::services::PredictionApi;

/// How often to poll and when to give up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// `None` polls until the service reports a terminal status.
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: None,
        }
    }
}

impl PollPolicy {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    fn exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }
}

/// Poll `request_id` until it completes, fails, or the policy gives up.
///
/// The first check happens one interval after the request was queued.
#[instrument(skip(api, shared, policy))]
pub(crate) async fn poll_until_done(
    api: Arc<dyn PredictionApi>,
    shared: Arc<Shared>,
    generation: Generation,
    request_id: String,
    policy: PollPolicy,
) {
    let mut attempts: u32 = 0;

    loop {
        tokio::time::sleep(policy.interval).await;
        attempts += 1;

        let response = match api.check_status(&request_id).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, attempts, "Status check failed");
                shared.update(|state| state.poll_failed(generation));
                return;
            }
        };

        let reported = response.status.clone();
        match shared.update(|state| state.apply_poll(generation, response)) {
            PollStep::Pending => debug!(status = %reported, attempts, "Request pending"),
            PollStep::Completed => {
                info!(attempts, "Prediction completed");
                return;
            }
            PollStep::Failed => {
                if reported == RequestStatus::Completed {
                    let err = ClientError::MissingResult {
                        request_id: request_id.clone(),
                    };
                    warn!(error = %err, "Prediction failed");
                } else {
                    warn!(status = %reported, "Prediction service reported failure");
                }
                return;
            }
            PollStep::Stale => {
                debug!("Discarding status for superseded request");
                return;
            }
        }

        if policy.exhausted(attempts) {
            let err = ClientError::PollLimitExceeded {
                request_id: request_id.clone(),
                attempts,
            };
            warn!(error = %err, "Giving up on request");
            shared.update(|state| state.poll_failed(generation));
            return;
        }
    }
}
