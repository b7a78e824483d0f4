//! Prediction request lifecycle: state, polling and the controller tying
//! them to the prediction service.

pub mod controller;
pub mod poller;
pub mod state;

pub use controller::{EstimateController, FeedbackOutcome};
pub use poller::PollPolicy;
pub use state::{EstimateState, FeedbackDraft, Generation, Notification, PollStep};
