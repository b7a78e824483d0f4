//! Domain types and DTOs
//!
//! Form input, request payloads and the prediction service's response models.

pub mod estimate;
pub mod form;
pub mod number;

pub use estimate::{
    Confidence, FeedbackPayload, PredictAccepted, PredictionResult, RequestStatus, StatusResponse,
};
pub use form::{Amenity, FieldEdit, FormData, FurnishingStatus, RequestPayload};
