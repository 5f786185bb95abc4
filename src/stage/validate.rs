// ABOUTME: Post-deploy validation: observational probes, no mutation.
// ABOUTME: Remote checks are fatal; the off-host HTTP probe only warns.

use crate::error::{Error, Result};
use crate::logfile::RunLog;
use crate::remote::{RemoteExecutor, RemoteScript};
use crate::session::DeploymentSession;
use std::time::Duration;

/// Remote-side checks: engine version, running containers, proxy status, and
/// a HEAD probe of the application's internal port. The curl probe is the
/// only strict step that can realistically fail here.
pub fn script(session: &DeploymentSession) -> RemoteScript {
    RemoteScript::new("validate")
        .step("sudo docker --version")
        .step("sudo docker ps")
        .step_ignore_absent("systemctl status nginx --no-pager")
        .step(format!(
            "curl -sI --max-time 10 http://127.0.0.1:{}",
            session.app_port
        ))
}

pub async fn run(
    executor: &dyn RemoteExecutor,
    session: &DeploymentSession,
    log: &mut RunLog,
) -> Result<()> {
    log.stage("validation");
    let script = script(session);
    let output = executor
        .run_script(&script)
        .await
        .map_err(|e| Error::ValidationCheck(e.to_string()))?;
    log.command_output(script.name(), &output);
    if !output.success() {
        return Err(Error::ValidationCheck(format!(
            "internal probe of 127.0.0.1:{} failed",
            session.app_port
        )));
    }

    Ok(())
}

/// HEAD probe of the host's public address from the pipeline's own vantage
/// point. Non-fatal: a firewall between here and the host is likely and not
/// a deployment failure; the remote-side checks are already in the log.
pub async fn public_probe(session: &DeploymentSession, log: &mut RunLog) {
    let url = format!("http://{}/", session.host);
    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("could not build HTTP client for public probe: {e}");
            return;
        }
    };

    match client.head(&url).send().await {
        Ok(response) => {
            log.line(&format!("public probe {url}: {}", response.status()));
        }
        Err(e) => {
            tracing::warn!("public probe of {url} failed: {e}");
            log.line(&format!(
                "warning: public probe of {url} failed ({e}); likely firewalled"
            ));
        }
    }
}
