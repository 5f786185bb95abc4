// ABOUTME: Integration tests for input resolution and validation.
// ABOUTME: Covers flag/env/prompt precedence, defaults, and failure exit codes.

use clap::Parser;
use provlita::cli::Cli;
use provlita::session::{DeploymentSession, ScriptedPrompt};

fn parse(args: &[&str]) -> Cli {
    let mut full = vec!["provlita"];
    full.extend_from_slice(args);
    Cli::parse_from(full)
}

mod resolution {
    use super::*;

    #[test]
    fn flags_bypass_all_prompts() {
        let key = tempfile::NamedTempFile::new().unwrap();
        let key_arg = key.path().to_str().unwrap();
        let cli = parse(&[
            "--repo-url",
            "https://example.com/org/app.git",
            "--branch",
            "release",
            "--user",
            "deploy",
            "--host",
            "10.0.0.5",
            "--key",
            key_arg,
            "--port",
            "3000",
        ]);

        // No scripted answers: any prompt would panic.
        let mut prompt = ScriptedPrompt::new(&[]);
        let session = DeploymentSession::resolve(&cli, &mut prompt).unwrap();
        assert_eq!(session.branch, "release");
        assert_eq!(session.app_port, 3000);
        assert!(!session.cleanup);
    }

    #[test]
    fn env_vars_supply_parameters() {
        let key = tempfile::NamedTempFile::new().unwrap();
        temp_env::with_vars(
            [
                ("REPO_URL", Some("https://example.com/org/app.git")),
                ("BRANCH", Some("main")),
                ("SERVER_USER", Some("deploy")),
                ("SERVER_HOST", Some("10.0.0.5")),
                ("SSH_KEY", Some(key.path().to_str().unwrap())),
                ("APP_PORT", Some("8080")),
            ],
            || {
                let cli = parse(&[]);
                let mut prompt = ScriptedPrompt::new(&[]);
                let session = DeploymentSession::resolve(&cli, &mut prompt).unwrap();
                assert_eq!(session.host, "10.0.0.5");
                assert_eq!(session.app_port, 8080);
            },
        );
    }

    #[test]
    fn prompts_fill_missing_parameters_with_defaults() {
        let key = tempfile::NamedTempFile::new().unwrap();
        // Env vars are cleared (under temp_env's lock) so parsing can't pick
        // up values from a concurrently running env test.
        temp_env::with_vars([("BRANCH", None::<&str>), ("APP_PORT", None)], || {
            let cli = parse(&[
                "--repo-url",
                "https://example.com/org/app.git",
                "--user",
                "deploy",
                "--host",
                "10.0.0.5",
                "--key",
                key.path().to_str().unwrap(),
            ]);

            // Branch and port are prompted; empty answers take the defaults.
            let mut prompt = ScriptedPrompt::new(&["", ""]);
            let session = DeploymentSession::resolve(&cli, &mut prompt).unwrap();
            assert_eq!(session.branch, "main");
            assert_eq!(session.app_port, 8080);
        });
    }

    #[test]
    fn unparseable_port_is_a_validation_error() {
        let key = tempfile::NamedTempFile::new().unwrap();
        temp_env::with_vars([("APP_PORT", None::<&str>)], || {
            let cli = parse(&[
                "--repo-url",
                "https://example.com/org/app.git",
                "--user",
                "deploy",
                "--host",
                "10.0.0.5",
                "--key",
                key.path().to_str().unwrap(),
                "--branch",
                "main",
            ]);

            let mut prompt = ScriptedPrompt::new(&["not-a-port"]);
            let err = DeploymentSession::resolve(&cli, &mut prompt).unwrap_err();
            assert_eq!(err.exit_code(), 2);
        });
    }
}

mod validation {
    use super::*;

    #[test]
    fn nonexistent_key_file_exits_2() {
        let cli = parse(&[
            "--repo-url",
            "https://example.com/org/app.git",
            "--branch",
            "main",
            "--user",
            "deploy",
            "--host",
            "10.0.0.5",
            "--key",
            "/nonexistent/id_ed25519",
            "--port",
            "8080",
        ]);

        let mut prompt = ScriptedPrompt::new(&[]);
        let err = DeploymentSession::resolve(&cli, &mut prompt).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("SSH key not found"));
    }

    #[test]
    fn key_path_naming_a_directory_exits_2() {
        let dir = tempfile::tempdir().unwrap();
        let cli = parse(&[
            "--repo-url",
            "https://example.com/org/app.git",
            "--branch",
            "main",
            "--user",
            "deploy",
            "--host",
            "10.0.0.5",
            "--key",
            dir.path().to_str().unwrap(),
            "--port",
            "8080",
        ]);

        let mut prompt = ScriptedPrompt::new(&[]);
        let err = DeploymentSession::resolve(&cli, &mut prompt).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn whitespace_host_is_rejected() {
        let key = tempfile::NamedTempFile::new().unwrap();
        let cli = parse(&[
            "--repo-url",
            "https://example.com/org/app.git",
            "--branch",
            "main",
            "--user",
            "deploy",
            "--host",
            "   ",
            "--key",
            key.path().to_str().unwrap(),
            "--port",
            "8080",
        ]);

        let mut prompt = ScriptedPrompt::new(&[]);
        let err = DeploymentSession::resolve(&cli, &mut prompt).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}

mod derived {
    use super::*;

    fn resolved(repo_url: &str, token: Option<&str>) -> DeploymentSession {
        let key = tempfile::NamedTempFile::new().unwrap();
        let mut args = vec![
            "--repo-url".to_string(),
            repo_url.to_string(),
            "--branch".to_string(),
            "main".to_string(),
            "--user".to_string(),
            "deploy".to_string(),
            "--host".to_string(),
            "10.0.0.5".to_string(),
            "--key".to_string(),
            key.path().to_str().unwrap().to_string(),
            "--port".to_string(),
            "8080".to_string(),
        ];
        if let Some(t) = token {
            args.push("--token".to_string());
            args.push(t.to_string());
        }
        let refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
        let cli = parse(&refs);
        let mut prompt = ScriptedPrompt::new(&[]);
        DeploymentSession::resolve(&cli, &mut prompt).unwrap()
    }

    #[test]
    fn repo_dir_name_handles_trailing_slash() {
        let session = resolved("https://example.com/org/app.git/", None);
        assert_eq!(session.repo_dir_name(), "app");
    }

    #[test]
    fn token_never_appears_in_redacted_url() {
        let session = resolved("https://example.com/org/app.git", Some("hunter2"));
        assert!(session.clone_url().contains("hunter2"));
        assert!(!session.redacted_url().contains("hunter2"));
    }

    #[test]
    fn log_file_name_carries_run_timestamp() {
        let session = resolved("https://example.com/org/app.git", None);
        let name = session.log_file_name();
        assert!(name.starts_with("deploy-"));
        assert!(name.ends_with(".log"));
        assert_eq!(name.len(), "deploy-YYYYmmdd-HHMMSS.log".len());
    }
}
