// ABOUTME: SSH-specific error types.
// ABOUTME: Covers connection, authentication, and command execution failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("connection timed out after {0:?}")]
    ConnectTimeout(std::time::Duration),

    #[error("authentication failed: key was not accepted")]
    AuthenticationFailed,

    #[error("failed to load key from {path}: {reason}")]
    KeyLoadFailed { path: PathBuf, reason: String },

    #[error("command execution failed: {0}")]
    CommandFailed(String),

    #[error("command timed out after {0:?}")]
    CommandTimeout(std::time::Duration),

    #[error("channel closed unexpectedly without exit status")]
    ChannelClosed,

    #[error("SSH protocol error: {0}")]
    Protocol(#[from] russh::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
