// ABOUTME: Reverse proxy configuration: render an nginx vhost, install, reload.
// ABOUTME: The config is syntax-checked before reload so a bad render never lands.

use crate::error::{Error, Result};
use crate::logfile::RunLog;
use crate::remote::{RemoteExecutor, RemoteScript};
use crate::session::{DeploymentSession, PROXY_CONF_PATH, PROXY_LINK_PATH};

/// nginx vhost: listen on 80, proxy everything to the app's internal port on
/// loopback, forward the usual client-identity headers.
pub fn render_config(port: u16) -> String {
    format!(
        r#"server {{
    listen 80;
    server_name _;

    location / {{
        proxy_pass http://127.0.0.1:{port};
        proxy_set_header Host $host;
        proxy_set_header X-Real-IP $remote_addr;
        proxy_set_header X-Forwarded-For $proxy_add_x_forwarded_for;
        proxy_set_header X-Forwarded-Proto $scheme;
    }}
}}
"#
    )
}

/// Upload the vhost, (re)create the enablement link, syntax-check, reload.
/// `set -eu` in the rendered script guarantees a failed `nginx -t` aborts
/// before the reload; reloading broken config would drop the working proxy.
pub fn script(session: &DeploymentSession) -> RemoteScript {
    let config = render_config(session.app_port);
    RemoteScript::new("configure-proxy")
        // Quoted heredoc delimiter: nginx's $variables must not be expanded.
        .step(format!(
            "sudo tee {PROXY_CONF_PATH} > /dev/null <<'PROVLITA_NGINX'\n{config}PROVLITA_NGINX"
        ))
        .step(format!("sudo ln -sf {PROXY_CONF_PATH} {PROXY_LINK_PATH}"))
        .step("sudo nginx -t")
        .step("sudo systemctl reload nginx")
}

pub async fn run(
    executor: &dyn RemoteExecutor,
    session: &DeploymentSession,
    log: &mut RunLog,
) -> Result<()> {
    log.stage("proxy configuration");
    let script = script(session);
    let output = executor
        .run_script(&script)
        .await
        .map_err(|e| Error::ProxyConfig(e.to_string()))?;
    log.command_output(script.name(), &output);
    if !output.success() {
        return Err(Error::ProxyConfig(format!(
            "proxy script exited with {}",
            output.exit_code
        )));
    }
    log.line(&format!(
        "proxy installed: {PROXY_CONF_PATH} -> 127.0.0.1:{}",
        session.app_port
    ));
    Ok(())
}
