// ABOUTME: The pipeline driver: linear, fail-fast stage sequence.
// ABOUTME: Local stages run first; no remote mutation before the connectivity gate.

pub mod cleanup;
pub mod deploy;
pub mod inspect;
pub mod prepare;
pub mod proxy;
pub mod source;
pub mod transfer;
pub mod validate;

use crate::error::{Error, Result};
use crate::logfile::RunLog;
use crate::remote::{RemoteExecutor, SshExecutor};
use crate::session::DeploymentSession;
use crate::ssh::{Session, SessionConfig};
use inspect::{ProjectProbe, Strategy};
use std::path::Path;
use std::time::Duration;

const GATE_SENTINEL: &str = "provlita-gate";
const GATE_TIMEOUT: Duration = Duration::from_secs(10);

/// Full deployment pipeline. Stages run in order; the first failure halts
/// the run and its error kind becomes the exit code.
pub async fn run_pipeline(
    session: &DeploymentSession,
    work_dir: &Path,
    log: &mut RunLog,
) -> Result<()> {
    // Local stages: nothing has touched the host yet.
    let source_dir = source::stage(session, work_dir, log).await?;

    log.stage("project inspection");
    let probe = ProjectProbe::detect(&source_dir);
    log.line(&format!(
        "build recipe: {}, compose manifest: {}",
        probe.has_build_recipe, probe.has_compose_manifest
    ));
    let strategy = probe.strategy().ok_or(Error::NothingToDeploy)?;

    let executor = connect(session, log).await?;
    gate(&executor, log).await?;

    let result = run_remote_stages(&executor, session, strategy, &source_dir, log).await;
    if result.is_ok() {
        validate::public_probe(session, log).await;
    }

    if let Err(e) = executor.disconnect().await {
        tracing::debug!("disconnect failed: {e}");
    }
    result
}

/// Remote half of the pipeline, behind the gate. Takes the executor as a
/// trait object so tests can drive it with a fake.
pub async fn run_remote_stages(
    executor: &dyn RemoteExecutor,
    session: &DeploymentSession,
    strategy: Strategy,
    source_dir: &Path,
    log: &mut RunLog,
) -> Result<()> {
    prepare::run(executor, log).await?;
    transfer::run(executor, session, source_dir, log).await?;
    deploy::run(executor, session, strategy, log).await?;
    proxy::run(executor, session, log).await?;
    validate::run(executor, session, log).await?;
    log.line("deployment succeeded");
    Ok(())
}

/// Cleanup mode: gate, then teardown. Local source staging is untouched.
pub async fn run_cleanup(session: &DeploymentSession, log: &mut RunLog) -> Result<()> {
    let executor = connect(session, log).await?;
    gate(&executor, log).await?;
    let result = cleanup::run(&executor, log).await;
    if let Err(e) = executor.disconnect().await {
        tracing::debug!("disconnect failed: {e}");
    }
    result
}

async fn connect(session: &DeploymentSession, log: &mut RunLog) -> Result<SshExecutor> {
    log.stage("connectivity");
    log.line(&format!(
        "connecting to {}@{} with key {}",
        session.user,
        session.host,
        session.key_path.display()
    ));
    let config = SessionConfig::new(&session.host, &session.user, &session.key_path)
        .connect_timeout(GATE_TIMEOUT);
    let ssh = Session::connect(config)
        .await
        .map_err(|e| Error::Connectivity(e.to_string()))?;
    Ok(SshExecutor::new(
        ssh,
        &session.host,
        &session.user,
        &session.key_path,
    ))
}

/// Trivial bounded remote command. Exists to fail fast before any mutating
/// operation is attempted.
pub async fn gate(executor: &dyn RemoteExecutor, log: &mut RunLog) -> Result<()> {
    let output = executor
        .run_with_timeout(&format!("echo {GATE_SENTINEL}"), GATE_TIMEOUT)
        .await
        .map_err(|e| Error::Connectivity(e.to_string()))?;
    if !output.success() || !output.stdout.contains(GATE_SENTINEL) {
        return Err(Error::Connectivity(
            "connectivity check did not echo back".into(),
        ));
    }
    log.line("host reachable");
    Ok(())
}
