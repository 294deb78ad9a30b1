use axum::extract::State;
use validator::Validate;

use crate::api::dto::{ContentRequest, ContentResponse};
use crate::api::extractors::AppJson;
use crate::api::response::{ApiError, ApiResponse};
use crate::api::AppState;
use crate::error::DeskError;

/// `POST /content`
#[utoipa::path(
    post,
    path = "/content",
    tag = "generators",
    request_body = ContentRequest,
    responses(
        (status = 200, description = "Content written", body = ContentResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 502, description = "LLM provider failed", body = ApiError),
    )
)]
pub async fn create_content(
    State(state): State<AppState>,
    AppJson(req): AppJson<ContentRequest>,
) -> ApiResponse<ContentResponse> {
    if let Err(e) = req.validate() {
        return DeskError::from(e).into();
    }

    let length = req.length();
    match state
        .content
        .generate(&req.topic, req.content_type, length)
        .await
    {
        Ok(outcome) => ApiResponse::success(outcome.into()),
        Err(e) => e.into(),
    }
}
