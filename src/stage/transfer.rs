// ABOUTME: Two-phase file transfer: rsync to staging, then promote to the live path.
// ABOUTME: The live path is never half-updated; staging absorbs slow transfers.

use crate::error::{Error, Result};
use crate::logfile::RunLog;
use crate::remote::{RemoteExecutor, RemoteScript};
use crate::session::{DeploymentSession, LIVE_PATH, STAGING_PATH};
use std::path::Path;

/// Paths never mirrored to the host: VCS metadata, local secrets,
/// dependency caches.
pub const SYNC_EXCLUDES: [&str; 3] = [".git", ".env", "node_modules"];

/// Promotion script: replace the live tree's contents with the staged tree.
pub fn promote_script(session: &DeploymentSession) -> RemoteScript {
    RemoteScript::new("promote")
        .step(format!("sudo mkdir -p {LIVE_PATH}"))
        .step(format!("sudo find {LIVE_PATH} -mindepth 1 -delete"))
        .step(format!("sudo cp -a {STAGING_PATH}/. {LIVE_PATH}/"))
        .step(format!(
            "sudo chown -R {user}:{user} {LIVE_PATH}",
            user = session.user
        ))
}

/// Mirror the staged source to the host and promote it to the live path.
pub async fn run(
    executor: &dyn RemoteExecutor,
    session: &DeploymentSession,
    source_dir: &Path,
    log: &mut RunLog,
) -> Result<()> {
    log.stage("file synchronization");

    log.line(&format!(
        "syncing {} -> {}:{STAGING_PATH}",
        source_dir.display(),
        session.host
    ));
    let output = executor
        .sync_tree(source_dir, STAGING_PATH, &SYNC_EXCLUDES)
        .await
        .map_err(|e| Error::Transfer(e.to_string()))?;
    log.command_output("rsync", &output);
    if !output.success() {
        return Err(Error::Transfer(format!(
            "rsync exited with {}",
            output.exit_code
        )));
    }

    let script = promote_script(session);
    let output = executor
        .run_script(&script)
        .await
        .map_err(|e| Error::Transfer(e.to_string()))?;
    log.command_output(script.name(), &output);
    if !output.success() {
        return Err(Error::Transfer(format!(
            "promote script exited with {}",
            output.exit_code
        )));
    }

    log.line(&format!("promoted staged tree to {LIVE_PATH}"));
    Ok(())
}
