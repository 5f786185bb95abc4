// ABOUTME: Application-wide error taxonomy for provlita.
// ABOUTME: One variant per pipeline stage, mapped to a stable exit code in main.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("host unreachable: {0}")]
    Connectivity(String),

    #[error("remote preparation failed: {0}")]
    RemotePrepare(String),

    #[error("file transfer failed: {0}")]
    Transfer(String),

    #[error("deployment failed: {0}")]
    Deploy(String),

    #[error("proxy configuration failed: {0}")]
    ProxyConfig(String),

    #[error("post-deploy validation failed: {0}")]
    ValidationCheck(String),

    #[error("source staging failed: {0}")]
    Source(String),

    #[error("nothing to deploy: no Dockerfile or compose manifest in the source root")]
    NothingToDeploy,

    #[error("interrupted")]
    Interrupted,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable exit code for this failure. Applied exactly once, at the
    /// process boundary in main.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_) => 2,
            Error::Connectivity(_) | Error::Transfer(_) => 3,
            Error::RemotePrepare(_) => 4,
            Error::Deploy(_) => 5,
            Error::ProxyConfig(_) => 6,
            Error::ValidationCheck(_) => 7,
            Error::Source(_) | Error::NothingToDeploy | Error::Interrupted | Error::Io(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
