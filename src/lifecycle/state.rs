//! Estimate state and its transition functions.
//!
//! Every mutation of the form, the request status, the result and the
//! feedback draft goes through a method here. Transitions triggered by an
//! asynchronous response carry the [`Generation`] of the submission that
//! started them; a response from an older generation is ignored.

use crate::domain::{
    number::parse_lenient_float, FeedbackPayload, FieldEdit, FormData, PredictionResult,
    RequestPayload, RequestStatus, StatusResponse,
};
use crate::error::{FormError, LifecycleError};

/// Identifies one submission. Bumped on every submit and reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

/// Outcome of applying one status response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStep {
    /// Request still pending; keep polling.
    Pending,
    Completed,
    /// Service reported a failure or an incomplete result.
    Failed,
    /// Response belongs to a superseded submission.
    Stale,
}

/// Sold-price entry shown under a completed estimate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackDraft {
    pub visible: bool,
    pub sold_price: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    FeedbackSaved,
    FeedbackFailed,
}

impl Notification {
    pub fn is_error(&self) -> bool {
        matches!(self, Notification::FeedbackFailed)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EstimateState {
    pub form: FormData,
    pub status: RequestStatus,
    pub request_id: Option<String>,
    pub result: Option<PredictionResult>,
    pub feedback: FeedbackDraft,
    pub notification: Option<Notification>,
    generation: Generation,
}

impl EstimateState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    fn is_current(&self, generation: Generation) -> bool {
        self.generation == generation
    }

    pub fn edit(&mut self, edit: FieldEdit) {
        self.form.apply(edit);
    }

    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        self.form.set_field(name, value)
    }

    /// A new request may start from IDLE, or from ERROR to try again.
    pub fn can_submit(&self) -> bool {
        matches!(self.status, RequestStatus::Idle | RequestStatus::Error)
    }

    /// IDLE/ERROR → SUBMITTING. Freezes the form into a payload.
    pub fn begin_submission(&mut self) -> Result<(Generation, RequestPayload), LifecycleError> {
        if !self.can_submit() {
            return Err(LifecycleError::Busy(self.status.clone()));
        }

        self.generation = self.generation.next();
        self.status = RequestStatus::Submitting;
        self.request_id = None;
        self.result = None;
        self.feedback = FeedbackDraft::default();
        self.notification = None;

        Ok((self.generation, self.form.to_payload()))
    }

    /// SUBMITTING → QUEUED. Returns false when the submission was superseded.
    pub fn submission_accepted(&mut self, generation: Generation, request_id: String) -> bool {
        if !self.is_current(generation) || self.status != RequestStatus::Submitting {
            return false;
        }
        self.status = RequestStatus::Queued;
        self.request_id = Some(request_id);
        true
    }

    pub fn submission_failed(&mut self, generation: Generation) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.status = RequestStatus::Error;
        true
    }

    /// Mirror one status response into the state.
    pub fn apply_poll(&mut self, generation: Generation, response: StatusResponse) -> PollStep {
        if !self.is_current(generation) || !self.status.is_in_flight() {
            return PollStep::Stale;
        }

        match response.status {
            RequestStatus::Completed => match response.result {
                Some(result) => {
                    self.result = Some(result);
                    self.status = RequestStatus::Completed;
                    PollStep::Completed
                }
                None => {
                    self.status = RequestStatus::Error;
                    PollStep::Failed
                }
            },
            RequestStatus::Error => {
                self.status = RequestStatus::Error;
                PollStep::Failed
            }
            // Client-side states are never valid service statuses; show them as reported
            client_only @ (RequestStatus::Idle | RequestStatus::Submitting) => {
                self.status = RequestStatus::Other(client_only.as_str().to_string());
                PollStep::Pending
            }
            other => {
                self.status = other;
                PollStep::Pending
            }
        }
    }

    pub fn poll_failed(&mut self, generation: Generation) -> bool {
        if !self.is_current(generation) || !self.status.is_in_flight() {
            return false;
        }
        self.status = RequestStatus::Error;
        true
    }

    /// Back to IDLE with a fresh form. Invalidates every outstanding response.
    pub fn reset(&mut self) {
        *self = EstimateState {
            generation: self.generation.next(),
            ..EstimateState::default()
        };
    }

    pub fn open_feedback(&mut self) {
        if self.result.is_some() {
            self.feedback.visible = true;
        }
    }

    pub fn close_feedback(&mut self) {
        self.feedback.visible = false;
    }

    pub fn set_sold_price(&mut self, value: impl Into<String>) {
        self.feedback.sold_price = value.into();
    }

    /// Feedback body, or `None` when there is no result or no price entered.
    pub fn feedback_payload(&self) -> Option<FeedbackPayload> {
        let result = self.result.as_ref()?;
        if self.feedback.sold_price.trim().is_empty() {
            return None;
        }
        Some(FeedbackPayload {
            request_id: result.request_id.clone(),
            actual_price: parse_lenient_float(&self.feedback.sold_price),
        })
    }

    /// Ignored when the estimate was reset while the feedback was in flight.
    pub fn feedback_succeeded(&mut self, generation: Generation) {
        if self.is_current(generation) {
            self.notification = Some(Notification::FeedbackSaved);
            self.feedback = FeedbackDraft::default();
        }
    }

    /// Keeps the draft so the user can resubmit.
    pub fn feedback_failed(&mut self) {
        self.notification = Some(Notification::FeedbackFailed);
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Confidence;

    fn result(request_id: &str) -> PredictionResult {
        PredictionResult {
            request_id: request_id.to_string(),
            estimated_price: 320_000.0,
            confidence: Confidence::Medium,
            rule_generated_warnings: vec![],
            generated_at: None,
        }
    }

    fn status(s: &str) -> StatusResponse {
        StatusResponse {
            status: RequestStatus::from(s),
            result: None,
        }
    }

    fn completed(request_id: &str) -> StatusResponse {
        StatusResponse {
            status: RequestStatus::Completed,
            result: Some(result(request_id)),
        }
    }

    #[test]
    fn happy_path_walks_forward() {
        let mut state = EstimateState::new();
        assert_eq!(state.status, RequestStatus::Idle);

        let (gen, payload) = state.begin_submission().unwrap();
        assert_eq!(state.status, RequestStatus::Submitting);
        assert_eq!(payload.area, 1076.0);

        assert!(state.submission_accepted(gen, "req-1".to_string()));
        assert_eq!(state.status, RequestStatus::Queued);
        assert_eq!(state.request_id.as_deref(), Some("req-1"));

        assert_eq!(state.apply_poll(gen, status("PROCESSING")), PollStep::Pending);
        assert_eq!(state.apply_poll(gen, status("PROCESSING")), PollStep::Pending);
        assert_eq!(state.status, RequestStatus::Processing);

        assert_eq!(state.apply_poll(gen, completed("req-1")), PollStep::Completed);
        assert_eq!(state.status, RequestStatus::Completed);
        assert_eq!(state.result, Some(result("req-1")));
    }

    #[test]
    fn submission_is_rejected_while_busy_or_showing_a_result() {
        let mut state = EstimateState::new();
        let (gen, _) = state.begin_submission().unwrap();

        assert!(matches!(
            state.begin_submission(),
            Err(LifecycleError::Busy(RequestStatus::Submitting))
        ));

        state.submission_accepted(gen, "req-1".to_string());
        state.apply_poll(gen, completed("req-1"));
        assert!(matches!(
            state.begin_submission(),
            Err(LifecycleError::Busy(RequestStatus::Completed))
        ));
    }

    #[test]
    fn error_allows_a_fresh_submission() {
        let mut state = EstimateState::new();
        let (gen, _) = state.begin_submission().unwrap();
        assert!(state.submission_failed(gen));
        assert_eq!(state.status, RequestStatus::Error);

        let (next, _) = state.begin_submission().unwrap();
        assert!(next > gen);
    }

    #[test]
    fn unknown_statuses_are_mirrored() {
        let mut state = EstimateState::new();
        let (gen, _) = state.begin_submission().unwrap();
        state.submission_accepted(gen, "req-1".to_string());

        assert_eq!(state.apply_poll(gen, status("NEEDS_REVIEW")), PollStep::Pending);
        assert_eq!(state.status, RequestStatus::Other("NEEDS_REVIEW".to_string()));
    }

    #[test]
    fn completed_without_result_is_an_error() {
        let mut state = EstimateState::new();
        let (gen, _) = state.begin_submission().unwrap();
        state.submission_accepted(gen, "req-1".to_string());

        assert_eq!(state.apply_poll(gen, status("COMPLETED")), PollStep::Failed);
        assert_eq!(state.status, RequestStatus::Error);
        assert!(state.result.is_none());
    }

    #[test]
    fn reset_discards_late_responses() {
        let mut state = EstimateState::new();
        state.set_field("area", "250").unwrap();
        let (gen, _) = state.begin_submission().unwrap();
        state.submission_accepted(gen, "req-1".to_string());

        state.reset();
        assert_eq!(state.status, RequestStatus::Idle);
        assert_eq!(state.form, FormData::default());

        assert_eq!(state.apply_poll(gen, completed("req-1")), PollStep::Stale);
        assert!(!state.poll_failed(gen));
        assert!(!state.submission_failed(gen));
        assert_eq!(state.status, RequestStatus::Idle);
        assert!(state.result.is_none());
    }

    #[test]
    fn feedback_needs_result_and_price() {
        let mut state = EstimateState::new();
        state.set_sold_price("350000");
        assert!(state.feedback_payload().is_none());

        let (gen, _) = state.begin_submission().unwrap();
        state.submission_accepted(gen, "req-9".to_string());
        state.apply_poll(gen, completed("req-9"));

        state.open_feedback();
        assert!(state.feedback.visible);
        assert!(state.feedback_payload().is_none());

        state.set_sold_price("350000");
        let payload = state.feedback_payload().unwrap();
        assert_eq!(payload.request_id, "req-9");
        assert_eq!(payload.actual_price, 350_000.0);
    }

    #[test]
    fn feedback_outcomes_update_notification_and_draft() {
        let mut state = EstimateState::new();
        let (gen, _) = state.begin_submission().unwrap();
        state.submission_accepted(gen, "req-1".to_string());
        state.apply_poll(gen, completed("req-1"));
        state.open_feedback();
        state.set_sold_price("abc");

        state.feedback_failed();
        assert_eq!(state.notification, Some(Notification::FeedbackFailed));
        assert_eq!(state.feedback.sold_price, "abc");
        assert!(state.feedback.visible);

        state.dismiss_notification();
        state.feedback_succeeded(state.generation());
        assert_eq!(state.notification, Some(Notification::FeedbackSaved));
        assert_eq!(state.feedback, FeedbackDraft::default());
    }

    #[test]
    fn feedback_success_after_reset_leaves_fresh_state_alone() {
        let mut state = EstimateState::new();
        let (gen, _) = state.begin_submission().unwrap();
        state.submission_accepted(gen, "req-1".to_string());
        state.apply_poll(gen, completed("req-1"));
        let sent_with = state.generation();

        state.reset();
        state.feedback_succeeded(sent_with);
        assert!(state.notification.is_none());
        assert_eq!(state.status, RequestStatus::Idle);
        assert!(state.result.is_none());
    }
}
