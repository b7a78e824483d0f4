//! Service layer modules for external integrations.
//!
//! Contains the prediction service client and the trait the lifecycle uses
//! to talk to it.

pub mod prediction_client;

pub use prediction_client::{PredictionApi, PredictionClient};
