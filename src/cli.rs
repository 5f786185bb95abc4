// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Every deployment parameter can also arrive via a same-named env var.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "provlita")]
#[command(about = "Deploy a git repository to a remote host under Docker, behind nginx")]
#[command(version)]
pub struct Cli {
    /// Tear down everything a previous run created instead of deploying
    #[arg(long)]
    pub cleanup: bool,

    /// Repository URL to deploy (https or ssh transport)
    #[arg(long, env = "REPO_URL")]
    pub repo_url: Option<String>,

    /// Access token embedded into https clone URLs
    #[arg(long, env = "GIT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Branch to deploy
    #[arg(long, env = "BRANCH")]
    pub branch: Option<String>,

    /// Username on the remote host
    #[arg(long, env = "SERVER_USER")]
    pub user: Option<String>,

    /// Remote host address
    #[arg(long, env = "SERVER_HOST")]
    pub host: Option<String>,

    /// Path to the SSH private key
    #[arg(long, env = "SSH_KEY")]
    pub key: Option<PathBuf>,

    /// Port the application listens on inside the container
    #[arg(long, env = "APP_PORT")]
    pub port: Option<u16>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
