// pgshuttle/src/utils/naming.rs
use chrono::{DateTime, Local, TimeZone};
use std::fmt;
use std::fs;
use std::path::Path;

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const SCHEMA_PREFIX: &str = "backup_schema_";
const DATA_PREFIX: &str = "backup_data_";
const SQL_SUFFIX: &str = ".sql";

/// Timestamp token shared by every artifact of one run, e.g. `20240101_120000`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RunTimestamp(String);

impl RunTimestamp {
    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }

    pub fn from_datetime<Tz>(at: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        RunTimestamp(at.format(TIMESTAMP_FORMAT).to_string())
    }

    /// Accepts only well-formed tokens (`YYYYMMDD_HHMMSS`).
    pub fn parse(token: &str) -> Option<Self> {
        let (date, time) = token.split_once('_')?;
        let digits = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());
        if digits(date, 8) && digits(time, 6) {
            Some(RunTimestamp(token.to_string()))
        } else {
            None
        }
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// File names of a schema/data dump pair, relative to the backup volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupFiles {
    pub schema: String,
    pub data: String,
}

impl BackupFiles {
    pub fn for_run(timestamp: &RunTimestamp) -> Self {
        BackupFiles {
            schema: format!("{}{}{}", SCHEMA_PREFIX, timestamp, SQL_SUFFIX),
            data: format!("{}{}{}", DATA_PREFIX, timestamp, SQL_SUFFIX),
        }
    }
}

/// Finds the newest `backup_schema_<ts>.sql` in `dir` and returns the pair named after it.
///
/// Returns `None` when the directory is unreadable or holds no schema dump.
pub fn latest_backup_in(dir: &Path) -> Option<BackupFiles> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("Cannot scan backup directory {}: {}", dir.display(), e);
            return None;
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            let token = name.strip_prefix(SCHEMA_PREFIX)?.strip_suffix(SQL_SUFFIX)?;
            RunTimestamp::parse(token)
        })
        .max()
        .map(|ts| BackupFiles::for_run(&ts))
}
