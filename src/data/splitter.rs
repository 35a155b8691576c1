// ============================================================
// Layer 4: Train/Test Splitter
// ============================================================
// Shuffles samples and splits them into two sets:
//   - Training set: used to fit the scaler and update weights
//   - Test set:     held out for validation and evaluation
//
// The shuffle is driven by a SEEDED generator. `evaluate` runs
// in a separate process from `train` and never sees the split
// that training used; it re-derives it by calling this function
// with the same seed and fraction over the same data. With
// thread_rng the evaluation would score rows the model was
// trained on.
//
// Test size = ceil(total * test_fraction), so any non-zero
// fraction holds out at least one sample.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `samples` with `seed` and split into (train, test).
///
/// # Arguments
/// * `samples`       - All available samples (consumed by this function)
/// * `test_fraction` - Proportion held out, e.g. 0.2 = 20%, clamped to [0, 1]
/// * `seed`          - Same seed + same input = same split
pub fn split_train_test<T>(mut samples: Vec<T>, test_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total     = samples.len();
    let fraction  = test_fraction.clamp(0.0, 1.0);
    let test_size = ((total as f64) * fraction).ceil() as usize;
    let split_at  = total - test_size.min(total);

    // split_off(n) leaves [0..n) in `samples` and returns [n..total)
    let test = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} test (seed {})",
        samples.len(),
        test.len(),
        seed,
    );

    (samples, test)
}
