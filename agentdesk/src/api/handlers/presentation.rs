use axum::extract::State;
use validator::Validate;

use crate::api::dto::{PresentationRequest, PresentationResponse};
use crate::api::extractors::AppJson;
use crate::api::response::{ApiError, ApiResponse};
use crate::api::AppState;
use crate::error::DeskError;

/// `POST /presentation`
#[utoipa::path(
    post,
    path = "/presentation",
    tag = "generators",
    request_body = PresentationRequest,
    responses(
        (status = 200, description = "Presentation created", body = PresentationResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 502, description = "LLM provider failed", body = ApiError),
    )
)]
pub async fn create_presentation(
    State(state): State<AppState>,
    AppJson(req): AppJson<PresentationRequest>,
) -> ApiResponse<PresentationResponse> {
    if let Err(e) = req.validate() {
        return DeskError::from(e).into();
    }

    match state.presentation.generate(&req.topic, req.slides).await {
        Ok(outcome) => ApiResponse::success(outcome.into()),
        Err(e) => e.into(),
    }
}
