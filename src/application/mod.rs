// ============================================================
// Layer 2: Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// one goal per subcommand (train, evaluate or deploy).
//
// Rules for this layer:
//   - No ML math or model code here
//   - No argument parsing here (that's Layer 1)
//   - No direct file formats or HTTP (that's Layer 4 and 6)
//   - Only workflow coordination, plus the final result lines
//     printed for the user
//
// The three use cases share nothing at runtime. They hand off
// through files: models/ and metrics/.

// The training workflow
pub mod train_use_case;

// Score a trained model on the held-out split
pub mod evaluate_use_case;

// Publish the model folder to the hub
pub mod deploy_use_case;
