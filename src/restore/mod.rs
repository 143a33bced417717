mod logic;

use std::io::{BufRead, Write};

use crate::config::AppConfig;
use crate::errors::Result;
use crate::runner::CommandRunner;
use crate::utils::naming::RunTimestamp;
use crate::utils::prompt::Session;

/// How a restore run ended when no step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    Completed,
    /// The operator declined the confirmation; nothing touched the destination.
    Cancelled,
}

/// Public entry point for the restore process.
/// Drops the destination tables, then replays the schema dump and the data dump.
pub async fn run_restore_flow<R, I, O>(
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
    logic::perform_restore_orchestration(app_config, timestamp, backup_ran, session, runner).await
}
