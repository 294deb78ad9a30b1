use serde::{Deserialize, Serialize};
use validator::Validate;

use super::download_url;
use crate::services::PresentationOutcome;

/// Request body for `POST /presentation`.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
pub struct PresentationRequest {
    #[validate(length(min = 1, max = 500, message = "must be 1-500 characters"))]
    pub topic: String,
    /// Requested slide count. Out-of-range values are clamped; omitted uses the default.
    #[serde(default)]
    pub slides: Option<i64>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct PresentationResponse {
    pub message: String,
    pub filename: String,
    pub download_url: String,
    pub topic: String,
    pub slides_count: usize,
    pub slides_requested: u32,
    pub titles: Vec<String>,
}

impl From<PresentationOutcome> for PresentationResponse {
    fn from(outcome: PresentationOutcome) -> Self {
        Self {
            message: format!(
                "Created a {}-slide presentation about {}",
                outcome.slides.len(),
                outcome.topic
            ),
            download_url: download_url(&outcome.filename),
            titles: outcome.titles(),
            slides_count: outcome.slides.len(),
            slides_requested: outcome.slides_requested,
            filename: outcome.filename,
            topic: outcome.topic,
        }
    }
}
