// ABOUTME: Deployment execution: compose bring-up or single-container build-and-run.
// ABOUTME: Ends with a container listing and a fixed settle wait for app startup.

use crate::error::{Error, Result};
use crate::logfile::RunLog;
use crate::remote::{RemoteExecutor, RemoteScript};
use crate::session::{APP_NAME, DeploymentSession, LIVE_PATH};
use crate::stage::inspect::Strategy;
use std::time::Duration;

/// How long to let the application's startup routine settle before the proxy
/// is configured and probed.
pub const SETTLE_WAIT: Duration = Duration::from_secs(10);

const PS_COLUMNS: &str = "table {{.Names}}\t{{.Status}}\t{{.Ports}}";

/// Compose bring-up. The manifest is re-checked on the host in case the
/// promoted tree differs from what was inspected locally.
pub fn compose_script() -> RemoteScript {
    RemoteScript::new("deploy-compose")
        .step(format!("cd {LIVE_PATH}"))
        .step("test -f docker-compose.yml || test -f docker-compose.yaml")
        .step_ignore_absent("sudo docker compose down --remove-orphans")
        .step("sudo docker compose up -d --build")
        .step(format!("sudo docker ps --format '{PS_COLUMNS}'"))
}

/// Single-container bring-up: build, replace, run. The container's port is
/// published to an ephemeral loopback-only host port; only the local proxy
/// needs to reach it.
pub fn single_container_script(session: &DeploymentSession) -> RemoteScript {
    RemoteScript::new("deploy-single")
        .step(format!("cd {LIVE_PATH}"))
        .step(format!("sudo docker build -t {APP_NAME} ."))
        .step_ignore_absent(format!("sudo docker rm -f {APP_NAME}"))
        .step(format!(
            "sudo docker run -d --name {APP_NAME} -p 127.0.0.1::{port} {APP_NAME}",
            port = session.app_port
        ))
        .step(format!("sudo docker ps --format '{PS_COLUMNS}'"))
}

/// Bring the application up using the inspected strategy.
pub async fn run(
    executor: &dyn RemoteExecutor,
    session: &DeploymentSession,
    strategy: Strategy,
    log: &mut RunLog,
) -> Result<()> {
    log.stage("deployment");
    let script = match strategy {
        Strategy::Compose => compose_script(),
        Strategy::SingleContainer => single_container_script(session),
    };
    log.line(&format!("strategy: {script}"));

    let output = executor
        .run_script(&script)
        .await
        .map_err(|e| Error::Deploy(e.to_string()))?;
    log.command_output(script.name(), &output);
    if !output.success() {
        return Err(Error::Deploy(format!(
            "{script} script exited with {}",
            output.exit_code
        )));
    }

    log.line(&format!(
        "waiting {}s for application startup",
        SETTLE_WAIT.as_secs()
    ));
    tokio::time::sleep(SETTLE_WAIT).await;
    Ok(())
}
