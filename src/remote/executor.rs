// ABOUTME: Production RemoteExecutor: russh for commands, local rsync for trees.
// ABOUTME: rsync runs as a subprocess with the same key and relaxed host checks.

use super::{Error, ExecOutput, RemoteExecutor, Result};
use crate::ssh::{self, Session};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

/// Executor backed by an established SSH session. Tree sync shells out to
/// the local `rsync` binary because the delete-extraneous mirror semantics
/// are exactly what rsync already does.
pub struct SshExecutor {
    session: Session,
    host: String,
    user: String,
    key_path: PathBuf,
}

impl SshExecutor {
    pub fn new(session: Session, host: &str, user: &str, key_path: &Path) -> Self {
        Self {
            session,
            host: host.to_string(),
            user: user.to_string(),
            key_path: key_path.to_path_buf(),
        }
    }

    pub async fn disconnect(self) -> ssh::Result<()> {
        self.session.disconnect().await
    }

    fn convert(output: ssh::CommandOutput) -> ExecOutput {
        ExecOutput {
            exit_code: output.exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
        }
    }

    fn map_err(err: ssh::Error) -> Error {
        match err {
            ssh::Error::CommandTimeout(d) => Error::Timeout(d),
            other => Error::Exec(other.to_string()),
        }
    }
}

#[async_trait]
impl RemoteExecutor for SshExecutor {
    async fn run(&self, command: &str) -> Result<ExecOutput> {
        self.session
            .exec(command)
            .await
            .map(Self::convert)
            .map_err(Self::map_err)
    }

    async fn run_with_timeout(&self, command: &str, timeout: Duration) -> Result<ExecOutput> {
        self.session
            .exec_with_timeout(command, timeout)
            .await
            .map(Self::convert)
            .map_err(Self::map_err)
    }

    async fn sync_tree(
        &self,
        local: &Path,
        remote_dir: &str,
        excludes: &[&str],
    ) -> Result<ExecOutput> {
        // Trailing slash on the source: sync the tree's contents, not the
        // directory itself.
        let source = format!("{}/", local.display());
        let dest = format!("{}@{}:{}/", self.user, self.host, remote_dir);
        let ssh_command = format!(
            "ssh -i {} -o StrictHostKeyChecking=no -o UserKnownHostsFile=/dev/null",
            self.key_path.display()
        );

        let mut cmd = Command::new("rsync");
        cmd.arg("-az").arg("--delete").arg("-e").arg(&ssh_command);
        for exclude in excludes {
            cmd.arg("--exclude").arg(exclude);
        }
        cmd.arg(&source).arg(&dest);

        let output = cmd
            .output()
            .await
            .map_err(|e| Error::Transfer(format!("failed to spawn rsync: {e}")))?;

        Ok(ExecOutput {
            exit_code: output.status.code().unwrap_or(1) as u32,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
