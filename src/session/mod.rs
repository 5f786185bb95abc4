// ABOUTME: DeploymentSession - the single run's resolved parameter set.
// ABOUTME: Built once from flags/env/prompts, validated, then passed by reference.

mod prompt;

pub use prompt::{PromptInput, ScriptedPrompt, StdinPrompt};

use crate::cli::Cli;
use crate::error::{Error, Result};
use chrono::{DateTime, Local};
use std::path::PathBuf;

/// Remote staging path; rsync lands here first, no privilege needed.
pub const STAGING_PATH: &str = "/tmp/provlita-staging";
/// Remote live path; staged tree is promoted here atomically.
pub const LIVE_PATH: &str = "/opt/provlita";
/// nginx vhost file and its enablement link.
pub const PROXY_CONF_PATH: &str = "/etc/nginx/sites-available/provlita.conf";
pub const PROXY_LINK_PATH: &str = "/etc/nginx/sites-enabled/provlita.conf";
/// Fixed image and container name for the single-container strategy.
pub const APP_NAME: &str = "provlita-app";

const DEFAULT_BRANCH: &str = "main";

/// Immutable parameter set for one pipeline run.
#[derive(Debug, Clone)]
pub struct DeploymentSession {
    pub repo_url: String,
    pub token: Option<String>,
    pub branch: String,
    pub user: String,
    pub host: String,
    pub key_path: PathBuf,
    pub app_port: u16,
    pub started_at: DateTime<Local>,
    pub cleanup: bool,
}

impl DeploymentSession {
    /// Resolve all parameters: CLI flag / env var when supplied, otherwise an
    /// interactive prompt. Validates before returning; no remote operation
    /// happens until a session exists.
    pub fn resolve(cli: &Cli, prompt: &mut dyn PromptInput) -> Result<Self> {
        let repo_url = resolve_string(&cli.repo_url, prompt, "Repository URL", None)?;
        let token = match &cli.token {
            Some(t) if !t.is_empty() => Some(t.clone()),
            _ => None,
        };
        let branch = resolve_string(&cli.branch, prompt, "Branch", Some(DEFAULT_BRANCH))?;
        let user = resolve_string(&cli.user, prompt, "Remote user", None)?;
        let host = resolve_string(&cli.host, prompt, "Remote host", None)?;

        let key_path = match &cli.key {
            Some(p) => p.clone(),
            None => PathBuf::from(prompt.ask("SSH key path", None)?),
        };

        let app_port = match cli.port {
            Some(p) => p,
            None => {
                let answer = prompt.ask("Application port", Some("8080"))?;
                answer
                    .trim()
                    .parse::<u16>()
                    .map_err(|_| Error::Validation(format!("invalid port: {answer}")))?
            }
        };

        let session = Self {
            repo_url,
            token,
            branch,
            user,
            host,
            key_path,
            app_port,
            started_at: Local::now(),
            cleanup: cli.cleanup,
        };
        session.validate()?;
        Ok(session)
    }

    fn validate(&self) -> Result<()> {
        if self.repo_url.trim().is_empty() {
            return Err(Error::Validation("repository URL is required".into()));
        }
        if self.user.trim().is_empty() {
            return Err(Error::Validation("remote user is required".into()));
        }
        if self.host.trim().is_empty() {
            return Err(Error::Validation("remote host is required".into()));
        }
        if self.app_port == 0 {
            return Err(Error::Validation("application port must be positive".into()));
        }
        if !self.key_path.is_file() {
            return Err(Error::Validation(format!(
                "SSH key not found: {}",
                self.key_path.display()
            )));
        }
        Ok(())
    }

    /// Local staging directory name, derived from the repository URL.
    pub fn repo_dir_name(&self) -> String {
        let last = self
            .repo_url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or("app");
        last.trim_end_matches(".git").to_string()
    }

    /// Clone URL with the access token embedded as transport credentials.
    /// Only https URLs are rewritten; ssh transport authenticates via key.
    pub fn clone_url(&self) -> String {
        match &self.token {
            Some(token) if self.repo_url.starts_with("https://") => {
                let rest = self.repo_url.trim_start_matches("https://");
                format!("https://{token}@{rest}")
            }
            _ => self.repo_url.clone(),
        }
    }

    /// Display form of the clone URL. The token must never reach the log.
    pub fn redacted_url(&self) -> String {
        match &self.token {
            Some(_) if self.repo_url.starts_with("https://") => {
                let rest = self.repo_url.trim_start_matches("https://");
                format!("https://***@{rest}")
            }
            _ => self.repo_url.clone(),
        }
    }

    /// Log file name carrying the run's start timestamp.
    pub fn log_file_name(&self) -> String {
        format!("deploy-{}.log", self.started_at.format("%Y%m%d-%H%M%S"))
    }
}

/// Session with a real temporary key file, for unit tests. The tempfile is
/// returned so the key outlives the session.
#[cfg(test)]
pub fn test_session() -> (DeploymentSession, tempfile::NamedTempFile) {
    let key = tempfile::NamedTempFile::new().expect("temp key");
    let session = DeploymentSession {
        repo_url: "https://example.com/org/app.git".to_string(),
        token: None,
        branch: "main".to_string(),
        user: "deploy".to_string(),
        host: "server.example.com".to_string(),
        key_path: key.path().to_path_buf(),
        app_port: 8080,
        started_at: Local::now(),
        cleanup: false,
    };
    (session, key)
}

fn resolve_string(
    supplied: &Option<String>,
    prompt: &mut dyn PromptInput,
    question: &str,
    default: Option<&str>,
) -> Result<String> {
    match supplied {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Ok(prompt.ask(question, default)?),
    }
}
