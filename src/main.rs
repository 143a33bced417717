//! PostgreSQL Backup/Restore Tool
//!
//! Dumps a source database and restores dumps into a target database,
//! running the postgres client tools inside disposable docker containers.

// pgshuttle/src/main.rs
mod backup;
mod config;
mod errors;
mod restore;
mod runner;
mod utils;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use std::io::{BufRead, Write};
use std::process::ExitCode;
use std::time::Instant;

use config::AppConfig;
use errors::Result;
use restore::RestoreOutcome;
use runner::{CommandRunner, DockerRunner};
use utils::naming::{BackupFiles, RunTimestamp};
use utils::prompt::Session;

#[derive(Parser, Debug, Clone, Copy, Default)]
#[command(version, about = "Back up and restore PostgreSQL databases through docker")]
struct Cli {
    /// Create a backup
    #[arg(short, long)]
    backup: bool,

    /// Restore from a backup
    #[arg(short, long)]
    restore: bool,
}

impl Cli {
    fn any(&self) -> bool {
        self.backup || self.restore
    }
}

/// Main entry point for the backup/restore tool
#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let _ = env_logger::Builder::new()
        .format_timestamp(None)
        .format_module_path(false)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    let started = Instant::now();
    let timestamp = RunTimestamp::now();

    let outcome = {
        let mut session = Session::stdio();
        let outcome = start_app(cli, &timestamp, &mut session).await;
        if let Err(e) = &outcome {
            eprintln!("{}", format!("Error: {:#}", e).red());
        }
        outcome
    };

    println!("Total Time: {:.3?}", started.elapsed());
    println!("{}", completion_notice(outcome.is_ok()));

    if outcome.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn completion_notice(succeeded: bool) -> String {
    if succeeded {
        "🎉 Process completed successfully!".green().to_string()
    } else {
        "Process finished with errors.".red().to_string()
    }
}

/// Loads configuration and the docker runner, then hands over to `run_app`.
async fn start_app<I: BufRead, O: Write>(
    cli: Cli,
    timestamp: &RunTimestamp,
    session: &mut Session<I, O>,
) -> anyhow::Result<()> {
    if !cli.any() {
        log::info!("Neither --backup nor --restore given, nothing to do");
        return Ok(());
    }

    let app_config = AppConfig::from_env().context("Failed to load configuration")?;
    let mut runner = DockerRunner::new()?;
    run_app(cli, &app_config, timestamp, session, &mut runner).await?;
    Ok(())
}

/// Runs the backup and/or restore workflows, backup first, both named after `timestamp`.
async fn run_app<R, I, O>(
    cli: Cli,
    app_config: &AppConfig,
    timestamp: &RunTimestamp,
    session: &mut Session<I, O>,
    runner: &mut R,
) -> Result<()>
where
    R: CommandRunner,
    I: BufRead,
    O: Write,
{
    if cli.backup {
        println!("🚀 Starting Backup Process...");
        backup::run_backup_flow(app_config, &BackupFiles::for_run(timestamp), runner).await?;
    }

    if cli.restore {
        println!("🔄 Starting Restore Process...");
        let outcome =
            restore::run_restore_flow(app_config, timestamp, cli.backup, session, runner).await?;
        if outcome == RestoreOutcome::Cancelled {
            log::info!("Restore skipped, destination left untouched");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::runner::fake::RecordingRunner;
    use crate::utils::prompt::scripted;
    use std::path::{Path, PathBuf};

    fn config(backup_path: &Path) -> AppConfig {
        let backup_path = backup_path.display().to_string();
        let vars = [
            ("DB_HOST", "prod.example.com"),
            ("DB_PORT", "5432"),
            ("DB_USER", "reader"),
            ("DB_NAME", "shop"),
        ];
        AppConfig::from_lookup(
            |key| {
                if key == "BACKUP_PATH" {
                    return Some(backup_path.clone());
                }
                vars.iter().find(|(k, _)| *k == key).map(|(_, v)| v.to_string())
            },
            PathBuf::from("/work"),
        )
    }

    fn ts() -> RunTimestamp {
        RunTimestamp::parse("20240101_120000").unwrap()
    }

    fn cli(backup: bool, restore: bool) -> Cli {
        Cli { backup, restore }
    }

    #[test]
    fn test_cli_flags() {
        let parsed = Cli::try_parse_from(["pgshuttle", "-b", "--restore"]).unwrap();
        assert!(parsed.backup && parsed.restore);

        let parsed = Cli::try_parse_from(["pgshuttle"]).unwrap();
        assert!(!parsed.any());

        assert!(Cli::try_parse_from(["pgshuttle", "--sync"]).is_err());
    }

    #[test]
    fn test_completion_notice_reflects_outcome() {
        assert!(completion_notice(true).contains("Process completed successfully!"));
        assert!(completion_notice(false).contains("Process finished with errors."));
        assert!(!completion_notice(false).contains("successfully"));
    }

    #[tokio::test]
    async fn test_no_flags_is_a_no_op() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut session = scripted("");
        let mut runner = RecordingRunner::default();

        run_app(cli(false, false), &config(dir.path()), &ts(), &mut session, &mut runner).await?;

        assert!(runner.calls.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_backup_only_issues_two_dumps() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut session = scripted("");
        let mut runner = RecordingRunner::default();

        run_app(cli(true, false), &config(dir.path()), &ts(), &mut session, &mut runner).await?;

        assert_eq!(runner.labels(), vec!["Backup schema", "Backup data"]);
        assert!(runner.calls[0].1.to_string().contains("backup_schema_20240101_120000.sql"));
        assert!(runner.calls[1].1.to_string().contains("backup_data_20240101_120000.sql"));
        Ok(())
    }

    #[tokio::test]
    async fn test_restore_only_decline_is_not_an_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut session = scripted("s.sql\nd.sql\nno\n");
        let mut runner = RecordingRunner::default();

        run_app(cli(false, true), &config(dir.path()), &ts(), &mut session, &mut runner).await?;

        assert!(runner.calls.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_backup_and_restore_share_the_timestamp() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut session = scripted("y\n");
        let mut runner = RecordingRunner::default();

        run_app(cli(true, true), &config(dir.path()), &ts(), &mut session, &mut runner).await?;

        assert_eq!(
            runner.labels(),
            vec![
                "Backup schema",
                "Backup data",
                "Drop existing tables",
                "Restore schema",
                "Restore data"
            ]
        );
        let schema_arg = "/backups/backup_schema_20240101_120000.sql".to_string();
        assert!(runner.calls[0].1.args().contains(&schema_arg));
        assert!(runner.calls[3].1.args().contains(&schema_arg));
        Ok(())
    }

    #[tokio::test]
    async fn test_backup_failure_skips_restore() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut session = scripted("y\n");
        let mut runner = RecordingRunner::failing_on("Backup data");

        let err = run_app(cli(true, true), &config(dir.path()), &ts(), &mut session, &mut runner)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ExternalTool { .. }));
        assert_eq!(runner.labels(), vec!["Backup schema", "Backup data"]);
        Ok(())
    }
}
