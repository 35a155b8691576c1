// ============================================================
// Layer 4: Preprocessor and Feature Scaler
// ============================================================
// Turns raw DiamondRecords into model-ready samples.
//
// Preprocessing steps (applied in order):
//   1. Drop rows that are not physically meaningful
//      (zero-length dimensions, zero carat, NaN / inf values).
//      The public dataset has a handful of rows with x, y or z
//      recorded as 0; they would otherwise become outliers.
//   2. Encode each remaining row into 9 numeric features
//      (cut / color / clarity become their ordinal rank).
//
// Standardisation lives in FeatureScaler and is applied after
// the train/test split:
//
//   z = (x - mean) / std        (per feature column)
//
// The scaler must be fitted on the TRAINING split only, then
// applied to both splits. Fitting on everything would leak
// test-set statistics into training.

use serde::{Deserialize, Serialize};

use crate::data::dataset::DiamondSample;
use crate::domain::diamond::DiamondRecord;

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Filter and encode records into samples.
    pub fn prepare(&self, records: &[DiamondRecord]) -> Vec<DiamondSample> {
        let samples: Vec<DiamondSample> = records
            .iter()
            .filter(|r| r.is_physical())
            .map(DiamondSample::from)
            .collect();

        let dropped = records.len() - samples.len();
        if dropped > 0 {
            tracing::warn!(
                "Dropped {} of {} rows with missing or zero measurements",
                dropped,
                records.len()
            );
        }
        samples
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

// ─── FeatureScaler ────────────────────────────────────────────────────────────
/// Per-column standardisation fitted on a sample set.
///
/// Uses the population standard deviation. A constant column has
/// std 0 and is scaled by 1 instead, so it maps to all zeros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScaler {
    pub mean: Vec<f32>,
    pub std:  Vec<f32>,
}

impl FeatureScaler {
    /// Compute column means and standard deviations.
    /// An empty sample set yields an empty (identity) scaler.
    pub fn fit(samples: &[DiamondSample]) -> Self {
        let Some(first) = samples.first() else {
            return Self { mean: Vec::new(), std: Vec::new() };
        };
        let dims = first.feature_count();
        let n    = samples.len() as f64;

        // Accumulate in f64; f32 sums drift on ~40k rows
        let mut mean = vec![0.0f64; dims];
        for s in samples {
            for (m, &v) in mean.iter_mut().zip(&s.features) {
                *m += v as f64;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut var = vec![0.0f64; dims];
        for s in samples {
            for ((acc, &v), &m) in var.iter_mut().zip(&s.features).zip(&mean) {
                let d = v as f64 - m;
                *acc += d * d;
            }
        }

        let std = var
            .iter()
            .map(|&v| {
                let sd = (v / n).sqrt();
                if sd > 0.0 { sd as f32 } else { 1.0 }
            })
            .collect();

        Self {
            mean: mean.into_iter().map(|m| m as f32).collect(),
            std,
        }
    }

    pub fn dims(&self) -> usize {
        self.mean.len()
    }

    /// Standardise the features of every sample in place. Targets are untouched.
    pub fn transform(&self, samples: &mut [DiamondSample]) {
        for s in samples {
            for ((v, &m), &sd) in s.features.iter_mut().zip(&self.mean).zip(&self.std) {
                *v = (*v - m) / sd;
            }
        }
    }
}
