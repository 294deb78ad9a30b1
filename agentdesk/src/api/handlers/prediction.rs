use crate::api::dto::{PredictionRequest, PredictionResponse};
use crate::api::extractors::AppJson;
use crate::api::response::{ApiError, ApiResponse};
use crate::services::prediction;

/// `POST /prediction`
///
/// Fits a least-squares line. Without `data` the demo dataset is used.
#[utoipa::path(
    post,
    path = "/prediction",
    tag = "generators",
    request_body = PredictionRequest,
    responses(
        (status = 200, description = "Regression result", body = PredictionResponse),
        (status = 400, description = "Invalid request or unknown column", body = ApiError),
        (status = 422, description = "Dataset cannot be fitted", body = ApiError),
    )
)]
pub async fn create_prediction(
    AppJson(req): AppJson<PredictionRequest>,
) -> ApiResponse<PredictionResponse> {
    let result = match req.data {
        Some(records) => prediction::predict_records(&records, &req.target),
        None => prediction::predict_points(&prediction::demo_points()),
    };

    match result {
        Ok(outcome) => ApiResponse::success(outcome.into()),
        Err(e) => e.into(),
    }
}
