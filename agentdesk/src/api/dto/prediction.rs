use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::services::prediction::DEFAULT_TARGET;
use crate::services::PredictionOutcome;

fn default_target() -> String {
    DEFAULT_TARGET.to_string()
}

/// Request body for `POST /prediction`.
///
/// Omitting `data` runs the built-in demo dataset.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct PredictionRequest {
    /// Rows such as `{"x": 1, "y": 2.1}`.
    #[serde(default)]
    #[schema(value_type = Option<Vec<Object>>)]
    pub data: Option<Vec<Map<String, Value>>>,
    #[serde(default = "default_target")]
    pub target: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct PredictionResponse {
    pub message: String,
    pub feature: String,
    pub target: String,
    pub samples: usize,
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub mean_absolute_error: f64,
    /// Fitted value for every input row, in input order.
    pub predictions: Vec<f64>,
    pub equation: String,
}

impl From<PredictionOutcome> for PredictionResponse {
    fn from(outcome: PredictionOutcome) -> Self {
        let fit = outcome.regression;
        Self {
            message: format!(
                "Fitted a linear model predicting '{}' from '{}'",
                outcome.target, outcome.feature
            ),
            equation: format!(
                "{} = {:.4} * {} + {:.4}",
                outcome.target, fit.slope, outcome.feature, fit.intercept
            ),
            feature: outcome.feature,
            target: outcome.target,
            samples: outcome.samples,
            slope: fit.slope,
            intercept: fit.intercept,
            r_squared: fit.r_squared,
            mean_absolute_error: fit.mean_absolute_error,
            predictions: fit.predictions,
        }
    }
}
