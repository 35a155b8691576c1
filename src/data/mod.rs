// ============================================================
// Layer 4: Data Pipeline
// ============================================================
// Everything from the CSV file on disk to tensor batches:
//
//   diamonds.csv
//       │
//       ▼
//   CsvLoader         → parses rows into DiamondRecords
//       │
//       ▼
//   Preprocessor      → drops invalid rows, encodes 9 features
//       │
//       ▼
//   split_train_test  → seeded shuffle, 80/20 split
//       │
//       ▼
//   FeatureScaler     → fitted on train, applied to both splits
//       │
//       ▼
//   DiamondDataset    → implements Burn's Dataset trait
//       │
//       ▼
//   DiamondBatcher    → stacks samples into [N, F] / [N, 1] tensors
//
// `prepare_splits` runs the first four steps; both `train` and
// `evaluate` call it, which is what keeps their test splits equal.

use anyhow::{ensure, Result};

use crate::domain::traits::DiamondSource;

/// Reads diamonds.csv using the csv crate
pub mod loader;

/// Row filtering, feature encoding and standardisation
pub mod preprocessor;

/// Implements Burn's Dataset trait for diamond samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Seeded shuffle and train/test split
pub mod splitter;

use dataset::DiamondSample;
use preprocessor::{FeatureScaler, Preprocessor};

/// Standardised train and test samples plus the scaler fitted on train.
pub struct PreparedSplits {
    pub train:  Vec<DiamondSample>,
    pub test:   Vec<DiamondSample>,
    pub scaler: FeatureScaler,
}

impl PreparedSplits {
    /// Feature dimensionality of the training split.
    pub fn input_dim(&self) -> usize {
        self.scaler.dims()
    }
}

/// Load, clean, split and standardise the dataset.
pub fn prepare_splits(
    source:        &impl DiamondSource,
    test_fraction: f64,
    seed:          u64,
) -> Result<PreparedSplits> {
    let records = source.load_all()?;
    let samples = Preprocessor::new().prepare(&records);
    ensure!(!samples.is_empty(), "Dataset has no usable rows");

    let (mut train, mut test) = splitter::split_train_test(samples, test_fraction, seed);
    ensure!(!train.is_empty(), "Training split is empty (test fraction {test_fraction})");

    let scaler = FeatureScaler::fit(&train);
    scaler.transform(&mut train);
    scaler.transform(&mut test);

    tracing::info!("Split: {} train, {} test", train.len(), test.len());
    Ok(PreparedSplits { train, test, scaler })
}

#[cfg(test)]
pub(crate) mod test_support {
    use anyhow::Result;

    use crate::domain::diamond::{Clarity, Color, Cut, DiamondRecord};
    use crate::domain::traits::DiamondSource;

    /// In-memory source with a simple carat → price relationship.
    pub struct VecSource(pub Vec<DiamondRecord>);

    impl DiamondSource for VecSource {
        fn load_all(&self) -> Result<Vec<DiamondRecord>> {
            Ok(self.0.clone())
        }
    }

    pub fn synthetic(n: usize) -> VecSource {
        let cuts = [Cut::Fair, Cut::Good, Cut::VeryGood, Cut::Premium, Cut::Ideal];
        let records = (0..n)
            .map(|i| {
                let carat = 0.2 + (i % 40) as f64 * 0.05;
                DiamondRecord {
                    carat,
                    cut:     cuts[i % cuts.len()],
                    color:   Color::G,
                    clarity: Clarity::VS1,
                    depth:   61.0 + (i % 3) as f64,
                    table:   57.0,
                    price:   4000.0 * carat,
                    x:       4.0 + carat,
                    y:       4.0 + carat,
                    z:       2.5 + carat / 2.0,
                }
            })
            .collect();
        VecSource(records)
    }
}
