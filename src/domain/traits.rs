// ============================================================
// Layer 3: Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits, not
// against the CSV reader or the HTTP client directly:
//
//   - CsvLoader  implements DiamondSource
//   - HubClient  implements ModelHub
//
// Tests substitute in-memory implementations, so the use cases
// run without a dataset file or a network connection.

use std::path::Path;

use anyhow::Result;

use crate::domain::diamond::DiamondRecord;

// ─── DiamondSource ────────────────────────────────────────────────────────────
/// Any component that can produce the raw diamond table.
pub trait DiamondSource {
    /// Load every row. A malformed row fails the whole load.
    fn load_all(&self) -> Result<Vec<DiamondRecord>>;
}

// ─── ModelHub ─────────────────────────────────────────────────────────────────
/// A hosted registry that stores model artifacts by repository id
/// (`namespace/name`).
pub trait ModelHub {
    /// Check the credential and return the account name it belongs to.
    fn whoami(&self) -> Result<String>;

    /// Create the model repository, or reuse it if it already exists.
    /// Returns the repository URL.
    fn create_repo(&self, repo_id: &str) -> Result<String>;

    /// Upload every file under `folder` to the repository in one commit.
    /// Returns the number of files committed.
    fn upload_folder(&self, repo_id: &str, folder: &Path, message: &str) -> Result<usize>;
}
