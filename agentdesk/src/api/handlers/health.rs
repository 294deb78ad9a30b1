use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::llm::LlmBackend;

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthData {
    /// `healthy` when the LLM answers, otherwise `degraded`.
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub llm_configured: bool,
    pub llm_available: bool,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Only set for self-hosted OpenAI-compatible endpoints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// `GET /health`
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthData> {
    let llm_configured = state.llm.is_available();
    let llm_available = llm_configured && state.llm.ping().await;

    let (provider, base_url) = match state.llm.backend() {
        LlmBackend::Groq => (Some("groq"), None),
        LlmBackend::OpenAICompatible { base_url } => {
            (Some("openai-compatible"), Some(base_url.clone()))
        }
        LlmBackend::Unavailable { .. } => (None, None),
    };

    ApiResponse::success(HealthData {
        status: if llm_available { "healthy" } else { "degraded" }.to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        llm_configured,
        llm_available,
        model: state.llm.model().to_string(),
        provider: provider.map(str::to_string),
        base_url,
    })
}
