// ============================================================
// Layer 3: Regression Metrics
// ============================================================
// Scores a set of predictions against ground-truth targets.
//
//   MSE  = mean((y - ŷ)²)
//   RMSE = sqrt(MSE)
//   MAE  = mean(|y - ŷ|)
//   R²   = 1 - SS_res / SS_tot
//          SS_res = Σ(y - ŷ)²,  SS_tot = Σ(y - ȳ)²
//
// A constant target makes SS_tot zero; R² is then 1.0 for a
// perfect fit and 0.0 otherwise, so the score stays finite.
//
// The sums themselves come from linfa's SingleTargetRegression.
// Inputs are widened to f64 first (the model emits f32) to keep
// the sums stable over ~50k rows. linfa pads SS_tot with a tiny
// epsilon instead of special-casing it, so the constant-target
// rule above is applied here before delegating.

use linfa::metrics::SingleTargetRegression;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MetricsError {
    #[error("cannot score an empty prediction set")]
    Empty,
    #[error("{targets} targets but {predictions} predictions")]
    LengthMismatch { targets: usize, predictions: usize },
    #[error("metric computation failed: {0}")]
    Backend(String),
}

impl From<linfa::Error> for MetricsError {
    fn from(err: linfa::Error) -> Self {
        MetricsError::Backend(err.to_string())
    }
}

/// Validate lengths and widen both slices to f64 arrays.
fn to_arrays(
    targets:     &[f32],
    predictions: &[f32],
) -> Result<(Array1<f64>, Array1<f64>), MetricsError> {
    if targets.len() != predictions.len() {
        return Err(MetricsError::LengthMismatch {
            targets:     targets.len(),
            predictions: predictions.len(),
        });
    }
    if targets.is_empty() {
        return Err(MetricsError::Empty);
    }
    let widen = |xs: &[f32]| xs.iter().map(|&x| x as f64).collect::<Array1<f64>>();
    Ok((widen(targets), widen(predictions)))
}

pub fn mean_squared_error(targets: &[f32], predictions: &[f32]) -> Result<f64, MetricsError> {
    let (y, p) = to_arrays(targets, predictions)?;
    Ok(p.mean_squared_error(&y.view())?)
}

pub fn root_mean_squared_error(targets: &[f32], predictions: &[f32]) -> Result<f64, MetricsError> {
    mean_squared_error(targets, predictions).map(f64::sqrt)
}

pub fn mean_absolute_error(targets: &[f32], predictions: &[f32]) -> Result<f64, MetricsError> {
    let (y, p) = to_arrays(targets, predictions)?;
    Ok(p.mean_absolute_error(&y.view())?)
}

/// Coefficient of determination.
pub fn r2_score(targets: &[f32], predictions: &[f32]) -> Result<f64, MetricsError> {
    let (y, p) = to_arrays(targets, predictions)?;

    if y.iter().all(|&v| v == y[0]) {
        let perfect = y.iter().zip(p.iter()).all(|(a, b)| a == b);
        return Ok(if perfect { 1.0 } else { 0.0 });
    }
    Ok(p.r2(&y.view())?)
}

/// All scores for one evaluation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionReport {
    pub mse:  f64,
    pub rmse: f64,
    pub mae:  f64,
    pub r2:   f64,
}

impl RegressionReport {
    pub fn compute(targets: &[f32], predictions: &[f32]) -> Result<Self, MetricsError> {
        let mse = mean_squared_error(targets, predictions)?;
        Ok(Self {
            mse,
            rmse: mse.sqrt(),
            mae:  mean_absolute_error(targets, predictions)?,
            r2:   r2_score(targets, predictions)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_prediction() {
        let y = [1.0, 2.0, 3.0, 4.0];
        let report = RegressionReport::compute(&y, &y).unwrap();
        assert_eq!(report.mse, 0.0);
        assert_eq!(report.mae, 0.0);
        assert_eq!(report.r2, 1.0);
    }

    #[test]
    fn test_rmse_is_sqrt_of_mse() {
        // A handful of synthetic target/prediction pairs with varied error
        let cases: [(&[f32], &[f32]); 3] = [
            (&[3.0, -0.5, 2.0, 7.0], &[2.5, 0.0, 2.0, 8.0]),
            (&[326.0, 327.0, 334.0], &[400.0, 250.0, 330.0]),
            (&[0.1, 0.2], &[-5.0, 9.5]),
        ];
        for (y, p) in cases {
            let mse  = mean_squared_error(y, p).unwrap();
            let rmse = root_mean_squared_error(y, p).unwrap();
            assert!((rmse - mse.sqrt()).abs() < 1e-12);
            assert!((rmse * rmse - mse).abs() < 1e-9 * mse.max(1.0));
        }
    }

    #[test]
    fn test_known_values() {
        // Reference values for this pair are MSE 0.375 and R² ≈ 0.9486
        let y = [3.0, -0.5, 2.0, 7.0];
        let p = [2.5, 0.0, 2.0, 8.0];
        assert!((mean_squared_error(&y, &p).unwrap() - 0.375).abs() < 1e-9);
        assert!((mean_absolute_error(&y, &p).unwrap() - 0.5).abs() < 1e-9);
        assert!((r2_score(&y, &p).unwrap() - 0.948_608_137).abs() < 1e-6);
    }

    #[test]
    fn test_mean_predictor_scores_zero() {
        let y = [1.0, 2.0, 3.0];
        let p = [2.0, 2.0, 2.0];
        assert!(r2_score(&y, &p).unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_constant_targets() {
        let y = [5.0, 5.0, 5.0];
        assert_eq!(r2_score(&y, &y).unwrap(), 1.0);
        assert_eq!(r2_score(&y, &[4.0, 5.0, 6.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(mean_squared_error(&[], &[]), Err(MetricsError::Empty));
        assert_eq!(
            r2_score(&[1.0, 2.0], &[1.0]),
            Err(MetricsError::LengthMismatch { targets: 2, predictions: 1 })
        );
    }
}
