mod logic;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::runner::CommandRunner;
use crate::utils::naming::BackupFiles;

/// Public entry point for the backup process.
/// Dumps schema, then data, of the source database into the backup volume.
pub async fn run_backup_flow<R: CommandRunner>(
    app_config: &AppConfig,
    files: &BackupFiles,
    runner: &mut R,
) -> Result<()> {
    logic::perform_backup_orchestration(app_config, files, runner).await
}
