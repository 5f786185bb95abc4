// ABOUTME: Per-run append-only log file with timestamped lines.
// ABOUTME: Every stage event and all remote command output ends up here.

use crate::error::Result;
use crate::remote::ExecOutput;
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only run log. One file per invocation, named with the run's start
/// timestamp. Human-readable, one event per line.
pub struct RunLog {
    file: File,
    path: PathBuf,
}

impl RunLog {
    pub fn create(dir: &Path, file_name: &str) -> Result<Self> {
        let path = dir.join(file_name);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one timestamped event line.
    pub fn line(&mut self, message: &str) {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        // Log writes are best-effort; a full disk should not mask the
        // pipeline's own error.
        let _ = writeln!(self.file, "[{stamp}] {message}");
        tracing::debug!(target: "runlog", "{message}");
    }

    /// Append a stage banner.
    pub fn stage(&mut self, name: &str) {
        self.line(&format!("=== {name} ==="));
    }

    /// Append captured remote command output, stdout then stderr.
    pub fn command_output(&mut self, label: &str, output: &ExecOutput) {
        self.line(&format!("{label}: exit {}", output.exit_code));
        for line in output.stdout.lines() {
            self.line(&format!("  {line}"));
        }
        for line in output.stderr.lines() {
            self.line(&format!("  ! {line}"));
        }
    }
}
