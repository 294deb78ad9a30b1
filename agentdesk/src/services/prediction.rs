//! Ordinary least-squares line fitting over (x, y) datasets.

use serde_json::{Map, Value};
use tracing::info;

use crate::error::{DeskError, Result};
use crate::models::{DataPoint, RegressionResult};

pub const DEFAULT_TARGET: &str = "y";
pub const DEFAULT_FEATURE: &str = "x";

/// Sample dataset used when a chat request names no data of its own.
pub const DEMO_DATASET: [(f64, f64); 5] =
    [(1.0, 2.1), (2.0, 3.9), (3.0, 6.1), (4.0, 7.8), (5.0, 10.2)];

pub fn demo_points() -> Vec<DataPoint> {
    DEMO_DATASET.iter().copied().map(DataPoint::from).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionOutcome {
    pub feature: String,
    pub target: String,
    pub samples: usize,
    pub regression: RegressionResult,
}

/// Fits `y = slope * x + intercept` by closed-form least squares.
///
/// Fails with a computation error for fewer than two points, non-finite
/// values or x values without variance.
pub fn fit_linear(points: &[DataPoint]) -> Result<RegressionResult> {
    if points.len() < 2 {
        return Err(DeskError::Computation(format!(
            "At least 2 data points are required, got {}",
            points.len()
        )));
    }
    if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(DeskError::Computation(
            "Data contains non-finite values".to_string(),
        ));
    }
    if points.iter().all(|p| p.x == points[0].x) {
        return Err(DeskError::Computation(
            "x values have zero variance; a line cannot be fitted".to_string(),
        ));
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.y).sum::<f64>() / n;

    let (sxx, sxy) = points.iter().fold((0.0, 0.0), |(sxx, sxy), p| {
        let dx = p.x - mean_x;
        (sxx + dx * dx, sxy + dx * (p.y - mean_y))
    });
    if sxx == 0.0 || !sxx.is_finite() {
        return Err(DeskError::Computation(
            "x values have zero variance; a line cannot be fitted".to_string(),
        ));
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let predictions: Vec<f64> = points.iter().map(|p| slope * p.x + intercept).collect();

    let (ss_res, ss_tot, abs_err) = points.iter().zip(&predictions).fold(
        (0.0, 0.0, 0.0),
        |(ss_res, ss_tot, abs_err), (p, predicted)| {
            let residual = p.y - predicted;
            let spread = p.y - mean_y;
            (
                ss_res + residual * residual,
                ss_tot + spread * spread,
                abs_err + residual.abs(),
            )
        },
    );

    let r_squared = if ss_tot == 0.0 {
        // Constant y: the flat line is exact.
        if ss_res <= f64::EPSILON { 1.0 } else { 0.0 }
    } else {
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    };

    if !slope.is_finite() || !intercept.is_finite() {
        return Err(DeskError::Computation(
            "Regression produced non-finite coefficients".to_string(),
        ));
    }
    // Squared residuals of huge values overflow to infinity and inf / inf is NaN.
    if !r_squared.is_finite() || !abs_err.is_finite() {
        return Err(DeskError::Computation(
            "Regression error metrics overflowed".to_string(),
        ));
    }

    Ok(RegressionResult {
        slope,
        intercept,
        r_squared,
        mean_absolute_error: abs_err / n,
        predictions,
    })
}

/// Fits a dataset of plain (x, y) pairs.
pub fn predict_points(points: &[DataPoint]) -> Result<PredictionOutcome> {
    let regression = fit_linear(points)?;
    info!(
        samples = points.len(),
        r_squared = regression.r_squared,
        "Regression fitted"
    );

    Ok(PredictionOutcome {
        feature: DEFAULT_FEATURE.to_string(),
        target: DEFAULT_TARGET.to_string(),
        samples: points.len(),
        regression,
    })
}

/// Fits a dataset of JSON rows against the `target` column.
///
/// The feature column is `x` when present, otherwise the only other
/// numeric column.
pub fn predict_records(records: &[Map<String, Value>], target: &str) -> Result<PredictionOutcome> {
    let target = match target.trim() {
        "" => DEFAULT_TARGET,
        t => t,
    };
    if records.len() < 2 {
        return Err(DeskError::Computation(format!(
            "At least 2 data points are required, got {}",
            records.len()
        )));
    }

    let columns = column_names(records);
    if !columns.iter().any(|c| c == target) {
        return Err(DeskError::Validation(format!(
            "Target column '{target}' not found. Available columns: {}",
            columns.join(", ")
        )));
    }

    let feature = select_feature(records, &columns, target)?;
    let points = records
        .iter()
        .enumerate()
        .map(|(row, record)| {
            Ok(DataPoint::new(
                numeric_cell(record, &feature, row)?,
                numeric_cell(record, target, row)?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    let regression = fit_linear(&points)?;
    info!(
        feature = feature.as_str(),
        target,
        samples = points.len(),
        r_squared = regression.r_squared,
        "Regression fitted"
    );

    Ok(PredictionOutcome {
        feature,
        target: target.to_string(),
        samples: points.len(),
        regression,
    })
}

/// Column names in first-seen order across all rows.
fn column_names(records: &[Map<String, Value>]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for key in records.iter().flat_map(|r| r.keys()) {
        if !columns.contains(key) {
            columns.push(key.clone());
        }
    }
    columns
}

fn select_feature(
    records: &[Map<String, Value>],
    columns: &[String],
    target: &str,
) -> Result<String> {
    if target != DEFAULT_FEATURE && columns.iter().any(|c| c == DEFAULT_FEATURE) {
        return Ok(DEFAULT_FEATURE.to_string());
    }

    let candidates: Vec<&str> = columns
        .iter()
        .map(String::as_str)
        .filter(|c| *c != target && is_numeric_column(records, c))
        .collect();

    match candidates.as_slice() {
        [single] => Ok(single.to_string()),
        [] => Err(DeskError::Validation(
            "No numeric feature column available for prediction".to_string(),
        )),
        many => Err(DeskError::Validation(format!(
            "Multiple feature columns found ({}); name one of them 'x'",
            many.join(", ")
        ))),
    }
}

fn is_numeric_column(records: &[Map<String, Value>], column: &str) -> bool {
    records
        .iter()
        .all(|r| r.get(column).and_then(as_number).is_some())
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn numeric_cell(record: &Map<String, Value>, column: &str, row: usize) -> Result<f64> {
    match record.get(column).and_then(as_number) {
        Some(value) => Ok(value),
        None => Err(DeskError::Validation(format!(
            "Row {row}: column '{column}' is missing or not numeric"
        ))),
    }
}
