// ABOUTME: Cleanup mode: tear down everything the pipeline creates on a host.
// ABOUTME: Every step tolerates absence; a never-deployed host still exits 0.

use crate::error::{Error, Result};
use crate::logfile::RunLog;
use crate::remote::{RemoteExecutor, RemoteScript};
use crate::session::{LIVE_PATH, PROXY_CONF_PATH, PROXY_LINK_PATH, STAGING_PATH};

/// Full teardown. Each step is tolerated: "nothing to remove" is success.
/// The final syntax-check-and-reload is tolerated too, since nginx may be
/// effectively unconfigured once the vhost is gone.
pub fn script() -> RemoteScript {
    RemoteScript::new("cleanup")
        .step_ignore_absent("sudo systemctl stop nginx")
        .step_ignore_absent(format!(
            "cd {LIVE_PATH} && sudo docker compose down --remove-orphans"
        ))
        .step_ignore_absent("sudo docker rm -f $(sudo docker ps -aq)")
        .step_ignore_absent("sudo docker rmi -f $(sudo docker images -q)")
        .step_ignore_absent(format!("sudo rm -rf {LIVE_PATH} {STAGING_PATH}"))
        .step_ignore_absent(format!("sudo rm -f {PROXY_CONF_PATH} {PROXY_LINK_PATH}"))
        .step_ignore_absent("sudo nginx -t && sudo systemctl reload nginx")
}

/// Run the teardown script. Never touches local source staging.
pub async fn run(executor: &dyn RemoteExecutor, log: &mut RunLog) -> Result<()> {
    log.stage("cleanup");
    let script = script();
    let output = executor
        .run_script(&script)
        .await
        .map_err(|e| Error::Connectivity(e.to_string()))?;
    log.command_output(script.name(), &output);
    log.line("cleanup complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_step_is_tolerated() {
        let rendered = script().render();
        for line in rendered.lines().skip(1) {
            if line.is_empty() || line == "{" {
                continue;
            }
            assert!(
                line.ends_with("|| true") || line.starts_with('}'),
                "cleanup step must tolerate absence: {line}"
            );
        }
    }

    #[test]
    fn removes_live_tree_config_and_link() {
        let rendered = script().render();
        assert!(rendered.contains("rm -rf /opt/provlita /tmp/provlita-staging"));
        assert!(rendered.contains(
            "rm -f /etc/nginx/sites-available/provlita.conf /etc/nginx/sites-enabled/provlita.conf"
        ));
    }

    #[test]
    fn reload_after_removal_is_tolerated() {
        let rendered = script().render();
        assert!(rendered.contains("nginx -t && sudo systemctl reload nginx || true"));
    }
}
