use serde::Serialize;

use crate::api::response::ApiResponse;

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub docs: String,
    pub health: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct EndpointHelp {
    pub method: String,
    pub path: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HelpData {
    pub service: String,
    pub version: String,
    pub endpoints: Vec<EndpointHelp>,
    /// Chat messages that route to each generator.
    pub examples: Vec<String>,
}

const ENDPOINTS: &[(&str, &str, &str)] = &[
    (
        "POST",
        "/chat",
        "Route a free-text message to the matching generator",
    ),
    (
        "POST",
        "/presentation",
        "Generate a PowerPoint deck: {topic, slides}",
    ),
    (
        "POST",
        "/content",
        "Write an article, report, summary or essay: {topic, type, length}",
    ),
    (
        "POST",
        "/prediction",
        "Fit a linear regression: {data, target}",
    ),
    ("GET", "/download/{filename}", "Download a generated file"),
    ("GET", "/health", "Service and LLM status"),
    ("GET", "/help", "This listing"),
    ("GET", "/docs", "API reference"),
];

const EXAMPLES: &[&str] = &[
    "Create a 5-slide presentation about renewable energy",
    "Write a short report on machine learning trends",
    "Predict y for (1, 2.1) (2, 3.9) (3, 6.1)",
    "What is the difference between TCP and UDP?",
];

/// `GET /`
#[utoipa::path(
    get,
    path = "/",
    tag = "system",
    responses((status = 200, description = "Service banner", body = ServiceInfo))
)]
pub async fn root() -> ApiResponse<ServiceInfo> {
    ApiResponse::success(ServiceInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        docs: "/docs".to_string(),
        health: "/health".to_string(),
    })
}

/// `GET /help`
#[utoipa::path(
    get,
    path = "/help",
    tag = "system",
    responses((status = 200, description = "Capability listing", body = HelpData))
)]
pub async fn help() -> ApiResponse<HelpData> {
    ApiResponse::success(HelpData {
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: ENDPOINTS
            .iter()
            .map(|(method, path, description)| EndpointHelp {
                method: method.to_string(),
                path: path.to_string(),
                description: description.to_string(),
            })
            .collect(),
        examples: EXAMPLES.iter().map(|e| e.to_string()).collect(),
    })
}
