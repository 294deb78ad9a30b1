use axum::extract::State;
use validator::Validate;

use crate::api::dto::{ChatRequest, ChatResponse};
use crate::api::extractors::AppJson;
use crate::api::response::{ApiError, ApiResponse};
use crate::api::AppState;
use crate::error::DeskError;

/// `POST /chat`
///
/// Classifies the message by keyword and runs exactly one generator, or
/// answers it directly through the LLM.
#[utoipa::path(
    post,
    path = "/chat",
    tag = "chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Routed result", body = ChatResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 422, description = "Dataset cannot be fitted", body = ApiError),
        (status = 502, description = "LLM provider failed", body = ApiError),
    )
)]
pub async fn chat(
    State(state): State<AppState>,
    AppJson(req): AppJson<ChatRequest>,
) -> ApiResponse<ChatResponse> {
    if let Err(e) = req.validate() {
        return DeskError::from(e).into();
    }
    if req.message.trim().is_empty() {
        return DeskError::Validation("message must not be blank".to_string()).into();
    }

    match state.orchestrator.handle(&req.message).await {
        Ok(outcome) => ApiResponse::success(outcome.into()),
        Err(e) => e.into(),
    }
}
