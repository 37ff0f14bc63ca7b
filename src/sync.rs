//! Working-copy synchronization via the git executable.

use crate::error::{HookError, Result};
use std::path::Path;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;
use tracing::info;

/// Upper bound on a single git invocation; expiry counts as failure.
const SYNC_TIMEOUT: Duration = Duration::from_secs(300);

/// Capability to synchronize a local working copy with its remote.
///
/// Modeled as a trait so tests can substitute a fake without spawning a
/// real git process.
#[async_trait::async_trait]
pub trait Synchronizer: Send + Sync {
    /// Pulls the latest changes into `repo_dir`. Returns the combined
    /// stdout/stderr text of the underlying command on success.
    async fn pull(&self, repo_dir: &Path) -> Result<String>;

    /// Read-only probe that `repo_dir` is a valid git working tree.
    async fn check_working_tree(&self, repo_dir: &Path) -> Result<()>;
}

/// Synchronizer backed by the `git` binary on PATH.
pub struct GitSynchronizer;

impl GitSynchronizer {
    async fn run_git(&self, repo_dir: &Path, args: &[&str]) -> Result<String> {
        let operation = format!("git {}", args.join(" "));
        info!("Running (repo = '{}'): {}", repo_dir.display(), operation);

        let output = tokio::time::timeout(
            SYNC_TIMEOUT,
            Command::new("git")
                .arg("-C")
                .arg(repo_dir)
                .args(args)
                .output(),
        )
        .await
        .map_err(|_| HookError::GitOperationFailed {
            operation: operation.clone(),
            message: format!("timed out after {}s", SYNC_TIMEOUT.as_secs()),
        })?
        .map_err(|e| HookError::GitOperationFailed {
            operation: operation.clone(),
            message: format!("failed to start: {}", e),
        })?;

        let combined = combined_output(&output);
        if !output.status.success() {
            return Err(HookError::GitOperationFailed {
                operation,
                message: combined,
            });
        }
        Ok(combined)
    }
}

#[async_trait::async_trait]
impl Synchronizer for GitSynchronizer {
    async fn pull(&self, repo_dir: &Path) -> Result<String> {
        self.run_git(repo_dir, &["pull"]).await
    }

    async fn check_working_tree(&self, repo_dir: &Path) -> Result<()> {
        self.run_git(repo_dir, &["rev-parse", "--is-inside-work-tree"])
            .await?;
        Ok(())
    }
}

/// Combined stdout + stderr text, captured for diagnostics only.
fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}
