// ABOUTME: Remote execution contract: run commands and sync trees on the target host.
// ABOUTME: The RemoteExecutor trait is the seam that lets tests run without a host.

mod executor;
mod script;

pub use executor::SshExecutor;
pub use script::{RemoteScript, StepMode};

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Output from a remote command or transfer.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    pub exit_code: u32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("remote execution failed: {0}")]
    Exec(String),

    #[error("remote execution timed out after {0:?}")]
    Timeout(Duration),

    #[error("transfer failed: {0}")]
    Transfer(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Run-command and sync-tree primitives against the deployment target.
///
/// Transport errors surface as `Err`; a command that ran but exited nonzero
/// comes back as `Ok` with the exit code, so each stage decides what a
/// nonzero exit means for it.
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    /// Run a command, capturing stdout, stderr, and exit status.
    async fn run(&self, command: &str) -> Result<ExecOutput>;

    /// Run a command with an explicit time bound.
    async fn run_with_timeout(&self, command: &str, timeout: Duration) -> Result<ExecOutput>;

    /// Mirror a local directory tree to a remote path, deleting extraneous
    /// remote files, skipping `excludes`.
    async fn sync_tree(
        &self,
        local: &Path,
        remote_dir: &str,
        excludes: &[&str],
    ) -> Result<ExecOutput>;

    /// Render and run a script template.
    async fn run_script(&self, script: &RemoteScript) -> Result<ExecOutput> {
        self.run(&script.render()).await
    }
}
