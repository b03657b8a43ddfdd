//! API request/response models for course recommendations.

use crate::recommendations::Recommendation;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecommendationRequest {
    /// The student's goal or interest
    #[serde(default)]
    #[schema(example = "I want to become a data scientist")]
    pub prompt: String,
}

/// Returned when the model's reply was not the expected JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecommendationFallback {
    /// Always `true`
    pub fallback: bool,
    /// The model's reply, verbatim
    pub raw: String,
    pub message: String,
}

/// Either the structured recommendation or the raw-text fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum RecommendationResponse {
    Fallback(RecommendationFallback),
    Recommendation(Recommendation),
}
