//! # Response Envelope & Error Contract
//!
//! Every JSON endpoint returns an [`ApiResponse<T>`]:
//!
//! ```json
//! { "data": { ... } }
//! { "error": { "code": "upstream_error", "message": "..." } }
//! ```
//!
//! The HTTP status is derived from the [`ErrorCode`] on failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::DeskError;

/// Machine-readable error code, serialized as snake_case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed body, missing fields or invalid parameters. HTTP 400.
    InvalidRequest,
    /// Unknown file or resource. HTTP 404.
    NotFound,
    /// The dataset cannot be fitted. HTTP 422.
    ComputationError,
    /// The LLM provider failed, refused or is not configured. HTTP 502.
    UpstreamError,
    /// Local failure; details are logged, never returned. HTTP 500.
    InternalError,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::ComputationError => StatusCode::UNPROCESSABLE_ENTITY,
            Self::UpstreamError => StatusCode::BAD_GATEWAY,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequest => write!(f, "invalid_request"),
            Self::NotFound => write!(f, "not_found"),
            Self::ComputationError => write!(f, "computation_error"),
            Self::UpstreamError => write!(f, "upstream_error"),
            Self::InternalError => write!(f, "internal_error"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApiError {
    pub code: ErrorCode,
    /// Human-readable description safe to show to end users.
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,

    /// Not serialized on the wire.
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            status: StatusCode::OK,
        }
    }

    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        let status = code.status();
        Self {
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
            status,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        match serde_json::to_value(&self) {
            Ok(body) => (status, Json(body)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize response body");
                let body = serde_json::json!({
                    "error": {
                        "code": "internal_error",
                        "message": "An internal error occurred"
                    }
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

impl<T: Serialize> From<DeskError> for ApiResponse<T> {
    /// Upstream messages are passed through; local failures are logged and masked.
    fn from(err: DeskError) -> Self {
        match err {
            DeskError::Validation(ref msg) => {
                ApiResponse::error(ErrorCode::InvalidRequest, msg.clone())
            }

            DeskError::Json(ref e) => {
                ApiResponse::error(ErrorCode::InvalidRequest, format!("Invalid JSON: {e}"))
            }

            DeskError::NotFound(ref msg) => ApiResponse::error(ErrorCode::NotFound, msg.clone()),

            DeskError::Computation(ref msg) => {
                ApiResponse::error(ErrorCode::ComputationError, msg.clone())
            }

            ref upstream @ (DeskError::Llm(_)
            | DeskError::LlmUnavailable(_)
            | DeskError::LlmRateLimit(_)) => {
                tracing::warn!(error = %upstream, "Upstream LLM failure");
                ApiResponse::error(ErrorCode::UpstreamError, upstream.to_string())
            }

            ref internal @ (DeskError::Render(_) | DeskError::Io(_) | DeskError::Internal(_)) => {
                tracing::error!(error = %internal, "Internal error mapped to response");
                ApiResponse::error(ErrorCode::InternalError, "An internal error occurred")
            }
        }
    }
}

impl IntoResponse for DeskError {
    fn into_response(self) -> Response {
        ApiResponse::<()>::from(self).into_response()
    }
}
