use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Agentdesk API",
        version = "0.1.0",
        description = "Routes natural-language requests to LLM-backed generators for slide decks, written content and linear regression.",
    ),
    paths(
        handlers::help::root,
        handlers::help::help,
        handlers::health::health_check,
        handlers::chat::chat,
        handlers::presentation::create_presentation,
        handlers::content::create_content,
        handlers::prediction::create_prediction,
        handlers::download::download,
    ),
    components(schemas(
        response::ErrorCode,
        response::ApiError,
        dto::ChatRequest,
        dto::ChatResponse,
        dto::GenericResponse,
        dto::PresentationRequest,
        dto::PresentationResponse,
        dto::ContentRequest,
        dto::ContentResponse,
        dto::PredictionRequest,
        dto::PredictionResponse,
        handlers::health::HealthData,
        handlers::help::ServiceInfo,
        handlers::help::HelpData,
        handlers::help::EndpointHelp,
    )),
    tags(
        (name = "system", description = "Banner, help and health"),
        (name = "chat", description = "Keyword-routed free-text requests"),
        (name = "generators", description = "Presentation, content and prediction generators"),
        (name = "files", description = "Generated file downloads"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
