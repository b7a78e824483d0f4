//! Client for a housing price prediction service.
//!
//! Collects housing attributes into a form, submits them, polls the service
//! until the estimate is ready and optionally sends the actual sold price
//! back as feedback.

pub mod config;
pub mod domain;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod presenter;
pub mod services;

pub use lifecycle::{EstimateController, PollPolicy};
pub use services::{PredictionApi, PredictionClient};
