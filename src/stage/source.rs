// ABOUTME: Source staging: clone or update the local working copy via git.
// ABOUTME: Token-bearing URLs are rewritten for clone and redacted in the log.

use crate::error::{Error, Result};
use crate::logfile::RunLog;
use crate::session::DeploymentSession;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Clone or update the repository and check out the requested branch.
/// Returns the staged tree's path.
pub async fn stage(
    session: &DeploymentSession,
    work_dir: &Path,
    log: &mut RunLog,
) -> Result<PathBuf> {
    log.stage("source staging");
    let repo_dir = work_dir.join(session.repo_dir_name());
    let token = session.token.as_deref();

    if repo_dir.join(".git").is_dir() {
        log.line(&format!(
            "updating existing checkout {} from {}",
            repo_dir.display(),
            session.redacted_url()
        ));
        git(&repo_dir, &["fetch", "--all", "--prune"], token, log).await?;
        git(&repo_dir, &["checkout", &session.branch], token, log).await?;
        git(&repo_dir, &["pull", "origin", &session.branch], token, log).await?;
    } else {
        log.line(&format!(
            "cloning {} into {}",
            session.redacted_url(),
            repo_dir.display()
        ));
        let clone_url = session.clone_url();
        let target = repo_dir.to_string_lossy().to_string();
        git(work_dir, &["clone", &clone_url, &target], token, log).await?;
        git(&repo_dir, &["checkout", &session.branch], token, log).await?;
    }

    Ok(repo_dir)
}

/// Run one git command, streaming its output into the run log. git repeats
/// the remote URL in progress and error messages, so every logged line is
/// scrubbed of the token first.
async fn git(dir: &Path, args: &[&str], token: Option<&str>, log: &mut RunLog) -> Result<()> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .await
        .map_err(|e| Error::Source(format!("failed to spawn git: {e}")))?;

    // git's progress output lands on stderr even on success
    for raw in String::from_utf8_lossy(&output.stdout)
        .lines()
        .chain(String::from_utf8_lossy(&output.stderr).lines())
    {
        log.line(&format!("  {}", redact(raw, token)));
    }

    if !output.status.success() {
        return Err(Error::Source(format!(
            "git {} exited with {}",
            args.first().unwrap_or(&"?"),
            output.status.code().unwrap_or(1)
        )));
    }
    Ok(())
}

fn redact(line: &str, token: Option<&str>) -> String {
    match token {
        Some(t) if !t.is_empty() => line.replace(t, "***"),
        _ => line.to_string(),
    }
}
