// ============================================================
// Layer 3: Domain Layer
// ============================================================
// Pure Rust structs and traits that define what the system
// works with: diamonds, their graded attributes, and the
// regression scores used to judge a trained model.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or network calls
//   - Only plain Rust structs, enums, traits and arithmetic
//
// Keeping it pure means everything here is unit-testable
// without a backend, a dataset on disk, or a network.

// One diamond row and its graded attributes
pub mod diamond;

// MSE / RMSE / MAE / R² over prediction and target slices
pub mod metrics;

// Core abstractions (traits) that other layers implement
pub mod traits;
