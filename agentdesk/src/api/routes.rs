use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::openapi;
use super::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.config.server.max_body_bytes;

    Router::new()
        .route("/", get(handlers::help::root))
        .route("/help", get(handlers::help::help))
        .route("/health", get(handlers::health_check))
        .route("/chat", post(handlers::chat::chat))
        .route(
            "/presentation",
            post(handlers::presentation::create_presentation),
        )
        .route("/content", post(handlers::content::create_content))
        .route("/prediction", post(handlers::prediction::create_prediction))
        .route("/download/{filename}", get(handlers::download::download))
        .route("/openapi.json", get(openapi::openapi_json))
        .merge(openapi::redoc_router())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
