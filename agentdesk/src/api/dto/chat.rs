use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{ContentResponse, PredictionResponse, PresentationResponse};
use crate::services::ChatOutcome;

/// Request body for `POST /chat`.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 10000, message = "must be 1-10000 characters"))]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct GenericResponse {
    pub response: String,
}

/// Routed chat result: `{"action": "...", "result": {...}}`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(tag = "action", content = "result", rename_all = "snake_case")]
pub enum ChatResponse {
    Presentation(PresentationResponse),
    Content(ContentResponse),
    Prediction(PredictionResponse),
    Generic(GenericResponse),
}

impl From<ChatOutcome> for ChatResponse {
    fn from(outcome: ChatOutcome) -> Self {
        match outcome {
            ChatOutcome::Presentation(p) => ChatResponse::Presentation(p.into()),
            ChatOutcome::Content(c) => ChatResponse::Content(c.into()),
            ChatOutcome::Prediction(p) => ChatResponse::Prediction(p.into()),
            ChatOutcome::Generic { response } => {
                ChatResponse::Generic(GenericResponse { response })
            }
        }
    }
}
