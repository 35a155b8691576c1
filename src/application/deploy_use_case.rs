// ============================================================
// Layer 2: DeployUseCase
// ============================================================
// Publishes the model folder to a hosted model hub:
//
//   Step 1: Check the local folder exists
//   Step 2: Validate the credential  (whoami)
//   Step 3: Create or reuse the repo
//   Step 4: Upload the folder as one commit
//
// The credential itself is resolved before this use case is
// built (see HubClient::from_env), so a missing token fails
// before any of these steps run.

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::traits::ModelHub;

pub const DEFAULT_REPO_ID: &str = "Hiroshi99/diamond-model";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    pub repo_id:        String,
    pub folder:         PathBuf,
    pub commit_message: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            repo_id:        DEFAULT_REPO_ID.to_string(),
            folder:         PathBuf::from("models"),
            commit_message: "Upload diamond price model".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeployOutcome {
    pub account:  String,
    pub repo_url: String,
    pub files:    usize,
}

pub struct DeployUseCase<H: ModelHub> {
    config: DeployConfig,
    hub:    H,
}

impl<H: ModelHub> DeployUseCase<H> {
    pub fn new(config: DeployConfig, hub: H) -> Self {
        Self { config, hub }
    }

    pub fn execute(&self) -> Result<DeployOutcome> {
        let cfg = &self.config;

        ensure!(
            cfg.folder.is_dir(),
            "Model folder '{}' does not exist. Have you trained the model first?",
            cfg.folder.display()
        );

        let account = self.hub.whoami().context("Model hub login failed")?;
        tracing::info!("Logged in to the model hub as '{}'", account);

        let repo_url = self
            .hub
            .create_repo(&cfg.repo_id)
            .with_context(|| format!("Cannot create repository '{}'", cfg.repo_id))?;

        let files = self
            .hub
            .upload_folder(&cfg.repo_id, &cfg.folder, &cfg.commit_message)
            .with_context(|| {
                format!("Cannot upload '{}' to '{}'", cfg.folder.display(), cfg.repo_id)
            })?;

        println!("Model deployed successfully: {} ({} files)", repo_url, files);
        Ok(DeployOutcome { account, repo_url, files })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::Path;

    /// Records calls in order; optionally fails the upload.
    #[derive(Default)]
    struct FakeHub {
        calls:       RefCell<Vec<String>>,
        fail_upload: bool,
    }

    impl ModelHub for FakeHub {
        fn whoami(&self) -> Result<String> {
            self.calls.borrow_mut().push("whoami".into());
            Ok("tester".into())
        }

        fn create_repo(&self, repo_id: &str) -> Result<String> {
            self.calls.borrow_mut().push(format!("create {repo_id}"));
            Ok(format!("https://hub.test/{repo_id}"))
        }

        fn upload_folder(&self, repo_id: &str, folder: &Path, _message: &str) -> Result<usize> {
            self.calls.borrow_mut().push(format!("upload {repo_id}"));
            anyhow::ensure!(!self.fail_upload, "connection reset");
            Ok(std::fs::read_dir(folder)?.count())
        }
    }

    #[test]
    fn test_deploy_runs_login_create_upload_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("diamond_price_predictor.mpk"), b"w").unwrap();
        std::fs::write(tmp.path().join("train_config.json"), b"{}").unwrap();

        let cfg = DeployConfig { folder: tmp.path().to_path_buf(), ..DeployConfig::default() };
        let use_case = DeployUseCase::new(cfg, FakeHub::default());
        let outcome  = use_case.execute().unwrap();

        assert_eq!(outcome.account, "tester");
        assert_eq!(outcome.repo_url, "https://hub.test/Hiroshi99/diamond-model");
        assert_eq!(outcome.files, 2);
        assert_eq!(
            *use_case.hub.calls.borrow(),
            vec!["whoami", "create Hiroshi99/diamond-model", "upload Hiroshi99/diamond-model"]
        );
    }

    #[test]
    fn test_missing_folder_fails_before_any_hub_call() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = DeployConfig { folder: tmp.path().join("nope"), ..DeployConfig::default() };
        let use_case = DeployUseCase::new(cfg, FakeHub::default());

        assert!(use_case.execute().is_err());
        assert!(use_case.hub.calls.borrow().is_empty());
    }

    #[test]
    fn test_upload_failure_names_the_repository() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = DeployConfig { folder: tmp.path().to_path_buf(), ..DeployConfig::default() };
        let hub = FakeHub { fail_upload: true, ..FakeHub::default() };

        let err = DeployUseCase::new(cfg, hub).execute().unwrap_err();
        assert!(format!("{err:#}").contains("Hiroshi99/diamond-model"));
        assert!(format!("{err:#}").contains("connection reset"));
    }
}
