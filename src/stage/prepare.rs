// ABOUTME: Remote environment preparation: Docker, compose plugin, nginx.
// ABOUTME: Every install is guarded by an existence check so re-runs converge.

use crate::error::{Error, Result};
use crate::logfile::RunLog;
use crate::remote::{RemoteExecutor, RemoteScript};

/// Build the idempotent provisioning script. Supports the two package
/// manager families the pipeline targets: apt (Debian-style) and dnf/yum
/// (RedHat-style).
pub fn script() -> RemoteScript {
    RemoteScript::new("prepare")
        .step(
            r#"if command -v apt-get >/dev/null 2>&1; then
  PKG=apt
elif command -v dnf >/dev/null 2>&1; then
  PKG=dnf
elif command -v yum >/dev/null 2>&1; then
  PKG=yum
else
  echo "unsupported package manager" >&2
  exit 1
fi
echo "package manager: $PKG""#,
        )
        .step(
            r#"if command -v docker >/dev/null 2>&1; then
  echo "docker already installed"
else
  curl -fsSL https://get.docker.com | sudo sh
fi"#,
        )
        .step("sudo systemctl enable --now docker")
        .step(
            r#"if docker compose version >/dev/null 2>&1 || sudo docker compose version >/dev/null 2>&1; then
  echo "compose plugin already available"
elif [ "$PKG" = apt ]; then
  sudo apt-get update -y && sudo apt-get install -y docker-compose-plugin
else
  sudo "$PKG" install -y docker-compose-plugin
fi"#,
        )
        .step(
            r#"if command -v nginx >/dev/null 2>&1; then
  echo "nginx already installed"
elif [ "$PKG" = apt ]; then
  sudo apt-get update -y && sudo apt-get install -y nginx
else
  sudo "$PKG" install -y nginx
fi"#,
        )
        .step("sudo mkdir -p /etc/nginx/sites-available /etc/nginx/sites-enabled")
        .step("sudo systemctl enable --now nginx")
        // Group membership is a convenience; failure must not fail the run.
        .step_ignore_absent(r#"sudo usermod -aG docker "$(id -un)""#)
        .step("sudo docker --version")
        .step("sudo docker compose version")
        .step("nginx -v 2>&1")
}

/// Run the provisioning script on the host.
pub async fn run(executor: &dyn RemoteExecutor, log: &mut RunLog) -> Result<()> {
    log.stage("remote preparation");
    let script = script();
    let output = executor
        .run_script(&script)
        .await
        .map_err(|e| Error::RemotePrepare(e.to_string()))?;
    log.command_output(script.name(), &output);
    if !output.success() {
        return Err(Error::RemotePrepare(format!(
            "prepare script exited with {}",
            output.exit_code
        )));
    }
    Ok(())
}
