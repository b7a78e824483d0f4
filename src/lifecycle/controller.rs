//! Drives the estimate lifecycle against a [`PredictionApi`].

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use super::poller::{poll_until_done, PollPolicy};
use super::state::{EstimateState, Generation};
use crate::domain::{FieldEdit, RequestStatus};
use crate::error::{FormError, LifecycleError};
use crate::services::PredictionApi;

/// State shared between the controller and its poll task.
pub(crate) struct Shared {
    state: Mutex<EstimateState>,
    status_tx: watch::Sender<RequestStatus>,
}

impl Shared {
    fn new() -> Self {
        let (status_tx, _) = watch::channel(RequestStatus::Idle);
        Self {
            state: Mutex::new(EstimateState::new()),
            status_tx,
        }
    }

    /// Apply a transition and publish the resulting status.
    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut EstimateState) -> R) -> R {
        let mut state = self.state.lock();
        let out = f(&mut state);
        let status = &state.status;
        self.status_tx.send_if_modified(|current| {
            if *current != *status {
                *current = status.clone();
                true
            } else {
                false
            }
        });
        out
    }

    fn read<R>(&self, f: impl FnOnce(&EstimateState) -> R) -> R {
        f(&self.state.lock())
    }
}

/// Result of a feedback submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackOutcome {
    /// No result yet or no price entered; nothing was sent.
    Skipped,
    Sent,
    Failed,
}

/// Owns the estimate state and at most one running poll task.
pub struct EstimateController {
    api: Arc<dyn PredictionApi>,
    shared: Arc<Shared>,
    poll_task: Mutex<Option<JoinHandle<()>>>,
    policy: PollPolicy,
}

impl EstimateController {
    pub fn new(api: Arc<dyn PredictionApi>, policy: PollPolicy) -> Self {
        Self {
            api,
            shared: Arc::new(Shared::new()),
            poll_task: Mutex::new(None),
            policy,
        }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> EstimateState {
        self.shared.read(|state| state.clone())
    }

    pub fn status(&self) -> RequestStatus {
        self.shared.read(|state| state.status.clone())
    }

    /// Receive every status change.
    pub fn subscribe(&self) -> watch::Receiver<RequestStatus> {
        self.shared.status_tx.subscribe()
    }

    pub fn edit(&self, edit: FieldEdit) {
        self.shared.update(|state| state.edit(edit));
    }

    pub fn set_field(&self, name: &str, value: &str) -> Result<(), FormError> {
        self.shared.update(|state| state.set_field(name, value))
    }

    /// Submit the current form and start polling for the result.
    ///
    /// Returns the request id assigned by the service. Transport failures
    /// leave the status at ERROR and are returned without retrying.
    #[instrument(skip(self))]
    pub async fn submit(&self) -> Result<String, LifecycleError> {
        let (generation, payload) = self.shared.update(|state| state.begin_submission())?;
        self.cancel_poll();
        info!(area_sqft = payload.area, "Submitting prediction request");

        match self.api.submit_prediction(&payload).await {
            Ok(request_id) => {
                let accepted = self
                    .shared
                    .update(|state| state.submission_accepted(generation, request_id.clone()));

                if accepted {
                    info!(request_id = %request_id, "Prediction request queued");
                    self.start_poll(generation, request_id.clone());
                } else {
                    debug!(request_id = %request_id, "Estimate was reset while submitting");
                }
                Ok(request_id)
            }
            Err(e) => {
                error!(error = %e, "Prediction request failed");
                self.shared
                    .update(|state| state.submission_failed(generation));
                Err(e.into())
            }
        }
    }

    fn start_poll(&self, generation: Generation, request_id: String) {
        let task = tokio::spawn(poll_until_done(
            Arc::clone(&self.api),
            Arc::clone(&self.shared),
            generation,
            request_id,
            self.policy.clone(),
        ));

        if let Some(previous) = self.poll_task.lock().replace(task) {
            previous.abort();
        }
    }

    fn cancel_poll(&self) {
        if let Some(task) = self.poll_task.lock().take() {
            task.abort();
        }
    }

    /// Discard the current estimate and start over with a default form.
    pub fn new_estimate(&self) {
        self.cancel_poll();
        self.shared.update(|state| state.reset());
        debug!("Estimate reset");
    }

    /// Wait until no request is in flight and return the settled status.
    pub async fn wait_until_settled(&self) -> RequestStatus {
        let mut rx = self.subscribe();
        loop {
            let status = rx.borrow_and_update().clone();
            if !status.is_in_flight() {
                return status;
            }
            if rx.changed().await.is_err() {
                return self.status();
            }
        }
    }

    pub fn open_feedback(&self) {
        self.shared.update(|state| state.open_feedback());
    }

    pub fn close_feedback(&self) {
        self.shared.update(|state| state.close_feedback());
    }

    pub fn set_sold_price(&self, value: impl Into<String>) {
        let value = value.into();
        self.shared.update(|state| state.set_sold_price(value));
    }

    pub fn dismiss_notification(&self) {
        self.shared.update(|state| state.dismiss_notification());
    }

    /// Send the entered sold price for the completed estimate.
    #[instrument(skip(self))]
    pub async fn submit_feedback(&self) -> FeedbackOutcome {
        let prepared = self
            .shared
            .read(|state| state.feedback_payload().map(|p| (state.generation(), p)));
        let Some((generation, payload)) = prepared else {
            debug!("Feedback skipped: no result or no price entered");
            return FeedbackOutcome::Skipped;
        };

        match self.api.submit_feedback(&payload).await {
            Ok(()) => {
                info!(request_id = %payload.request_id, "Feedback submitted");
                self.shared
                    .update(|state| state.feedback_succeeded(generation));
                FeedbackOutcome::Sent
            }
            Err(e) => {
                warn!(error = %e, request_id = %payload.request_id, "Feedback submission failed");
                self.shared.update(|state| state.feedback_failed());
                FeedbackOutcome::Failed
            }
        }
    }
}

impl Drop for EstimateController {
    fn drop(&mut self) {
        self.cancel_poll();
    }
}
