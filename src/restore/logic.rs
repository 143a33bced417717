// pgshuttle/src/restore/logic.rs
use colored::Colorize;
use std::io::{BufRead, Write};
use std::path::Path;

use super::RestoreOutcome;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::runner::{CommandRunner, docker};
use crate::utils::naming::{BackupFiles, RunTimestamp, latest_backup_in};
use crate::utils::progress::Spinner;
use crate::utils::prompt::Session;

const CONFIRM_PROMPT: &str = "Are you sure you want to continue? (yes/no): ";

/// Picks the dump pair to restore.
///
/// A backup taken in this run is restored as-is. Otherwise the operator names both files,
/// with the newest pair found in the backup directory offered as the default.
fn resolve_files<I: BufRead, O: Write>(
    backup_path: &str,
    timestamp: &RunTimestamp,
    backup_ran: bool,
    session: &mut Session<I, O>,
) -> Result<BackupFiles> {
    if backup_ran {
        return Ok(BackupFiles::for_run(timestamp));
    }

    let defaults = latest_backup_in(Path::new(backup_path)).unwrap_or_else(|| {
        println!(
            "{}",
            format!("⚠️ No backup_schema_*.sql found in {}.", backup_path).yellow()
        );
        BackupFiles::for_run(timestamp)
    });

    Ok(BackupFiles {
        schema: session.ask_file_name(&defaults.schema)?,
        data: session.ask_file_name(&defaults.data)?,
    })
}

/// Drop, restore schema, restore data; each step only after the previous one succeeded.
///
/// Nothing is executed unless the operator confirms. There is no rollback on failure.
pub async fn perform_restore_orchestration<R, I, O>(
    app_config: &AppConfig,
    timestamp: &RunTimestamp,
    backup_ran: bool,
    session: &mut Session<I, O>,
    runner: &mut R,
) -> Result<RestoreOutcome>
where
    R: CommandRunner,
    I: BufRead,
    O: Write,
{
    let backup_path = app_config.backup_path()?;
    let dest = &app_config.destination;

    let files = resolve_files(backup_path, timestamp, backup_ran, session)?;

    println!(
        "{}",
        format!(
            "Backup will be restored to the database {} in {} from {}/{} and {}/{}.",
            dest.database.white(),
            dest.port.white(),
            docker::BACKUP_MOUNT,
            files.schema,
            docker::BACKUP_MOUNT,
            files.data
        )
        .bright_blue()
    );

    let drop_script = app_config.working_dir.join(docker::DROP_SCRIPT);
    if !drop_script.exists() {
        println!(
            "{}",
            format!("⚠️ {} not found; the drop step will fail.", drop_script.display()).yellow()
        );
    }

    if !session.confirm(CONFIRM_PROMPT)? {
        println!("{}", "Process cancelled by the user.".red());
        log::info!("Restore cancelled by the operator");
        return Ok(RestoreOutcome::Cancelled);
    }

    let spinner = Spinner::start("Starting drop existing table process");
    runner
        .run(
            &docker::drop_tables(dest, backup_path, &app_config.working_dir),
            &spinner,
            "Drop existing tables",
        )
        .await?;

    let spinner = Spinner::start("Starting schema restore process");
    runner
        .run(
            &docker::psql_restore(dest, backup_path, &files.schema),
            &spinner,
            "Restore schema",
        )
        .await?;

    let spinner = Spinner::start("Starting data restore process");
    runner
        .run(
            &docker::psql_restore(dest, backup_path, &files.data),
            &spinner,
            "Restore data",
        )
        .await?;

    Ok(RestoreOutcome::Completed)
}
