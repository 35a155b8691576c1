// ============================================================
// Layer 6: Infrastructure Layer
// ============================================================
// Everything that touches the outside world in a fixed format:
//
//   checkpoint.rs  - model weights and the training record
//                    Burn's CompactRecorder for the weights,
//                    JSON (serde) for train_config.json so
//                    evaluate can rebuild the same model.
//
//   metrics.rs     - metrics/metrics.json ({"r2": ...}) and
//                    the per-epoch training_log.csv
//
//   hub_client.rs  - the model hub HTTP client (ureq)
//                    token lookup, repo creation, LFS upload
//                    and the single-commit folder upload
//
// The other layers never see file layouts or HTTP details.

/// Model weights and training record
pub mod checkpoint;

/// Evaluation metrics file and training log CSV
pub mod metrics;

/// Model hub client: credentials, repo creation, folder upload
pub mod hub_client;
