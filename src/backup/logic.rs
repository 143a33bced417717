// pgshuttle/src/backup/logic.rs
use colored::Colorize;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::runner::{CommandRunner, docker};
use crate::utils::naming::BackupFiles;
use crate::utils::progress::Spinner;

/// Dumps schema and data of the source database as two separate files.
///
/// The data dump only starts once the schema dump succeeded; the first failure is returned.
pub async fn perform_backup_orchestration<R: CommandRunner>(
    app_config: &AppConfig,
    files: &BackupFiles,
    runner: &mut R,
) -> Result<()> {
    let source = app_config.source()?;
    let backup_path = app_config.backup_path()?;

    println!(
        "🔍 Backing up database {} from {}:{} into {}",
        source.database.white(),
        source.host,
        source.port,
        backup_path
    );

    let spinner = Spinner::start("Starting schema backup process");
    runner
        .run(
            &docker::schema_dump(&source, backup_path, &files.schema),
            &spinner,
            "Backup schema",
        )
        .await?;

    let spinner = Spinner::start("Starting data backup process");
    runner
        .run(
            &docker::data_dump(&source, backup_path, &files.data),
            &spinner,
            "Backup data",
        )
        .await?;

    log::info!("Backup written to {}/{{{}, {}}}", backup_path, files.schema, files.data);
    Ok(())
}
