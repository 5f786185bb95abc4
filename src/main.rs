// ABOUTME: Entry point for the provlita CLI application.
// ABOUTME: Resolves the session, runs the pipeline, maps errors to exit codes.

use clap::Parser;
use provlita::cli::Cli;
use provlita::error::{Error, Result};
use provlita::logfile::RunLog;
use provlita::session::{DeploymentSession, StdinPrompt};
use provlita::stage;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    // The error kind decides the exit code exactly once, here.
    match run(cli).await {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let work_dir = env::current_dir()?;
    let session = DeploymentSession::resolve(&cli, &mut StdinPrompt)?;

    let mut log = RunLog::create(&work_dir, &session.log_file_name())?;
    log.line(&format!(
        "run started: {} ({}) -> {}@{}, port {}{}",
        session.redacted_url(),
        session.branch,
        session.user,
        session.host,
        session.app_port,
        if session.cleanup { " [cleanup]" } else { "" },
    ));
    println!("Logging to {}", log.path().display());

    // Single abort path: an interrupt wins the race, gets recorded, and the
    // host is left in whatever state the running stage produced.
    let result = tokio::select! {
        result = async {
            if session.cleanup {
                stage::run_cleanup(&session, &mut log).await
            } else {
                stage::run_pipeline(&session, &work_dir, &mut log).await
            }
        } => result,
        _ = tokio::signal::ctrl_c() => Err(Error::Interrupted),
    };

    match &result {
        Ok(()) => {
            log.line("run finished successfully");
            println!("Done.");
        }
        Err(e) => {
            log.line(&format!("run failed: {e}"));
        }
    }
    result
}
