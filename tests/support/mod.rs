// ABOUTME: Shared test support: a scripted fake RemoteExecutor.
// ABOUTME: Records every command so tests can assert stage ordering and content.

// Not every test binary uses every helper.
#![allow(dead_code)]

use async_trait::async_trait;
use provlita::remote::{Error, ExecOutput, RemoteExecutor, Result};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

/// One recorded interaction with the fake executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Run(String),
    Sync {
        remote_dir: String,
        excludes: Vec<String>,
    },
}

/// In-memory executor. Every command succeeds with empty output unless a
/// failure rule matches its text.
#[derive(Default)]
pub struct FakeExecutor {
    pub calls: Mutex<Vec<Call>>,
    /// Commands containing this substring exit nonzero.
    fail_on: Option<String>,
    /// Commands containing this substring fail at the transport level.
    error_on: Option<String>,
    /// Canned stdout for every run.
    stdout: String,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self {
            stdout: "ok".to_string(),
            ..Self::default()
        }
    }

    pub fn failing_on(substring: &str) -> Self {
        Self {
            fail_on: Some(substring.to_string()),
            stdout: "ok".to_string(),
            ..Self::default()
        }
    }

    pub fn erroring_on(substring: &str) -> Self {
        Self {
            error_on: Some(substring.to_string()),
            stdout: "ok".to_string(),
            ..Self::default()
        }
    }

    pub fn with_stdout(stdout: &str) -> Self {
        Self {
            stdout: stdout.to_string(),
            ..Self::default()
        }
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                Call::Run(cmd) => Some(cmd.clone()),
                Call::Sync { .. } => None,
            })
            .collect()
    }

    fn respond(&self, command: &str) -> Result<ExecOutput> {
        if let Some(needle) = &self.error_on {
            if command.contains(needle.as_str()) {
                return Err(Error::Exec(format!("injected transport failure: {needle}")));
            }
        }
        let exit_code = match &self.fail_on {
            Some(needle) if command.contains(needle.as_str()) => 1,
            _ => 0,
        };
        Ok(ExecOutput {
            exit_code,
            stdout: self.stdout.clone(),
            stderr: String::new(),
        })
    }
}

#[async_trait]
impl RemoteExecutor for FakeExecutor {
    async fn run(&self, command: &str) -> Result<ExecOutput> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Run(command.to_string()));
        self.respond(command)
    }

    async fn run_with_timeout(&self, command: &str, _timeout: Duration) -> Result<ExecOutput> {
        self.run(command).await
    }

    async fn sync_tree(
        &self,
        _local: &Path,
        remote_dir: &str,
        excludes: &[&str],
    ) -> Result<ExecOutput> {
        self.calls.lock().unwrap().push(Call::Sync {
            remote_dir: remote_dir.to_string(),
            excludes: excludes.iter().map(|s| s.to_string()).collect(),
        });
        self.respond("rsync")
    }
}

/// A valid session pointing at a real temp key file. Returns the tempfile so
/// it outlives the session.
pub fn test_session() -> (
    provlita::session::DeploymentSession,
    tempfile::NamedTempFile,
) {
    let key = tempfile::NamedTempFile::new().expect("temp key");
    let session = provlita::session::DeploymentSession {
        repo_url: "https://example.com/org/app.git".to_string(),
        token: None,
        branch: "main".to_string(),
        user: "deploy".to_string(),
        host: "server.example.com".to_string(),
        key_path: key.path().to_path_buf(),
        app_port: 8080,
        started_at: chrono::Local::now(),
        cleanup: false,
    };
    (session, key)
}

/// Run log writing into a temp dir. Returns the dir so the file survives.
pub fn test_log() -> (provlita::logfile::RunLog, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("temp dir");
    let log = provlita::logfile::RunLog::create(dir.path(), "deploy-test.log").expect("run log");
    (log, dir)
}
