// ABOUTME: SSH session management using russh.
// ABOUTME: Key-file authentication, relaxed host keys, command execution.

use super::error::{Error, Result};
use russh::client::{self, Config, Handle};
use russh::keys::{PrivateKeyWithHashAlg, load_secret_key, ssh_key};
use russh::{ChannelMsg, Disconnect};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for establishing an SSH session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Remote host to connect to.
    pub host: String,
    /// SSH port (default: 22).
    pub port: u16,
    /// Username for authentication.
    pub user: String,
    /// Path to the private key file.
    pub key_path: PathBuf,
    /// Timeout for the initial TCP/handshake phase.
    pub connect_timeout: Duration,
    /// Timeout for command execution (default: 30 minutes; package installs
    /// and image builds are slow).
    pub command_timeout: Duration,
}

impl SessionConfig {
    pub fn new(host: impl Into<String>, user: impl Into<String>, key_path: impl Into<PathBuf>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            user: user.into(),
            key_path: key_path.into(),
            connect_timeout: Duration::from_secs(10),
            command_timeout: Duration::from_secs(1800),
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }
}

/// Output from a remote command execution.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code of the command.
    pub exit_code: u32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Host-key handler that accepts any key. Deployment targets are often
/// freshly provisioned or re-imaged, so unknown and changed keys are expected;
/// the trade-off is logged loudly instead of enforced.
pub(crate) struct AcceptingHandler {
    host: String,
    port: u16,
}

impl client::Handler for AcceptingHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &ssh_key::PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        tracing::warn!(
            "accepting host key for {}:{} without verification",
            self.host,
            self.port
        );
        Ok(true)
    }
}

/// An established SSH session.
pub struct Session {
    config: SessionConfig,
    handle: Handle<AcceptingHandler>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("handle", &"<russh::Handle>")
            .finish()
    }
}

impl Session {
    /// Connect and authenticate. The connect phase is bounded by
    /// `connect_timeout`; this is the pipeline's connectivity gate.
    pub async fn connect(config: SessionConfig) -> Result<Self> {
        let key = load_secret_key(&config.key_path, None).map_err(|e| Error::KeyLoadFailed {
            path: config.key_path.clone(),
            reason: e.to_string(),
        })?;

        let russh_config = Config {
            inactivity_timeout: Some(Duration::from_secs(3600)),
            ..Default::default()
        };

        let handler = AcceptingHandler {
            host: config.host.clone(),
            port: config.port,
        };

        let connect = client::connect(
            Arc::new(russh_config),
            (config.host.as_str(), config.port),
            handler,
        );
        let mut handle = match tokio::time::timeout(config.connect_timeout, connect).await {
            Ok(Ok(handle)) => handle,
            Ok(Err(e)) => return Err(Error::Connection(e.to_string())),
            Err(_) => return Err(Error::ConnectTimeout(config.connect_timeout)),
        };

        let hash_alg = handle
            .best_supported_rsa_hash()
            .await
            .map_err(Error::Protocol)?
            .flatten();

        let result = handle
            .authenticate_publickey(
                &config.user,
                PrivateKeyWithHashAlg::new(Arc::new(key), hash_alg),
            )
            .await
            .map_err(Error::Protocol)?;

        if !result.success() {
            return Err(Error::AuthenticationFailed);
        }

        Ok(Self { config, handle })
    }

    /// Execute a command on the remote host.
    pub async fn exec(&self, command: &str) -> Result<CommandOutput> {
        self.exec_with_timeout(command, self.config.command_timeout)
            .await
    }

    /// Execute a command with a custom timeout.
    pub async fn exec_with_timeout(
        &self,
        command: &str,
        timeout: Duration,
    ) -> Result<CommandOutput> {
        match tokio::time::timeout(timeout, self.exec_inner(command)).await {
            Ok(result) => result,
            Err(_) => Err(Error::CommandTimeout(timeout)),
        }
    }

    async fn exec_inner(&self, command: &str) -> Result<CommandOutput> {
        let mut channel = self
            .handle
            .channel_open_session()
            .await
            .map_err(|e| Error::CommandFailed(format!("failed to open channel: {e}")))?;

        channel
            .exec(true, command)
            .await
            .map_err(|e| Error::CommandFailed(format!("failed to exec command: {e}")))?;

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let mut exit_code = 0u32;

        let mut got_exit_status = false;
        let mut got_eof = false;

        loop {
            match channel.wait().await {
                Some(ChannelMsg::Data { data }) => {
                    stdout.extend_from_slice(&data);
                }
                Some(ChannelMsg::ExtendedData { data, ext }) => {
                    if ext == 1 {
                        // stderr
                        stderr.extend_from_slice(&data);
                    }
                }
                Some(ChannelMsg::ExitStatus { exit_status }) => {
                    exit_code = exit_status;
                    got_exit_status = true;
                    if got_eof {
                        break;
                    }
                }
                Some(ChannelMsg::Eof) => {
                    got_eof = true;
                    if got_exit_status {
                        break;
                    }
                }
                Some(ChannelMsg::Close) => {
                    break;
                }
                Some(_) => {}
                None => break,
            }
        }

        // A channel that closes without an exit status means the transport
        // died underneath us.
        if !got_exit_status {
            return Err(Error::ChannelClosed);
        }

        Ok(CommandOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&stdout).to_string(),
            stderr: String::from_utf8_lossy(&stderr).to_string(),
        })
    }

    /// Disconnect the session.
    pub async fn disconnect(self) -> Result<()> {
        self.handle
            .disconnect(Disconnect::ByApplication, "", "en")
            .await
            .map_err(Error::Protocol)?;
        Ok(())
    }
}
