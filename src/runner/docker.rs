// pgshuttle/src/runner/docker.rs
//
// Builds the `docker run` invocations for the postgres client tools.
use std::fmt;
use std::path::Path;

use crate::config::ConnectionParams;

pub const IMAGE: &str = "postgres";
pub const BACKUP_MOUNT: &str = "/backups";
pub const WORKDIR_MOUNT: &str = "/currentdir";
pub const DROP_SCRIPT: &str = "drop_tables.sql";

const PASSWORD_VAR: &str = "PGPASSWORD";

/// A fully formed `docker` invocation: arguments plus the environment it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    args: Vec<String>,
    env: Vec<(String, String)>,
}

impl ToolCommand {
    /// `docker run --rm -e PGPASSWORD -v <backup_path>:/backups [extra mounts] postgres <tool...>`
    fn container(password: &str, backup_path: &str, extra_mounts: &[String]) -> Self {
        let mut args: Vec<String> = vec![
            "run".into(),
            "--rm".into(),
            "-e".into(),
            PASSWORD_VAR.into(),
            "-v".into(),
            format!("{}:{}", backup_path, BACKUP_MOUNT),
        ];
        for mount in extra_mounts {
            args.push("-v".into());
            args.push(mount.clone());
        }
        args.push(IMAGE.into());

        ToolCommand {
            args,
            env: vec![(PASSWORD_VAR.to_string(), password.to_string())],
        }
    }

    fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    fn connection(self, conn: &ConnectionParams) -> Self {
        self.arg("-h")
            .arg(&conn.host)
            .arg("-p")
            .arg(&conn.port)
            .arg("-U")
            .arg(&conn.user)
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn env(&self) -> &[(String, String)] {
        &self.env
    }
}

impl fmt::Display for ToolCommand {
    /// Secrets live in `env`, so the argument list is safe to print.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "docker {}", self.args.join(" "))
    }
}

fn backup_file(file: &str) -> String {
    format!("{}/{}", BACKUP_MOUNT, file)
}

fn pg_dump(source: &ConnectionParams, backup_path: &str, mode: &str, file: &str) -> ToolCommand {
    ToolCommand::container(&source.password, backup_path, &[])
        .arg("pg_dump")
        .connection(source)
        .arg(mode)
        .arg("-f")
        .arg(backup_file(file))
        .arg(&source.database)
}

/// `pg_dump --schema-only` of the source database into the backup volume.
pub fn schema_dump(source: &ConnectionParams, backup_path: &str, file: &str) -> ToolCommand {
    pg_dump(source, backup_path, "--schema-only", file)
}

/// `pg_dump --data-only` of the source database into the backup volume.
pub fn data_dump(source: &ConnectionParams, backup_path: &str, file: &str) -> ToolCommand {
    pg_dump(source, backup_path, "--data-only", file)
}

/// Runs `drop_tables.sql` from the working directory against the destination.
pub fn drop_tables(dest: &ConnectionParams, backup_path: &str, working_dir: &Path) -> ToolCommand {
    let workdir_mount = format!("{}:{}", working_dir.display(), WORKDIR_MOUNT);
    ToolCommand::container(&dest.password, backup_path, &[workdir_mount])
        .arg("psql")
        .connection(dest)
        .arg("-d")
        .arg(&dest.database)
        .arg("-f")
        .arg(format!("{}/{}", WORKDIR_MOUNT, DROP_SCRIPT))
}

/// Feeds a dump file from the backup volume into the destination with `psql -a -f`.
pub fn psql_restore(dest: &ConnectionParams, backup_path: &str, file: &str) -> ToolCommand {
    ToolCommand::container(&dest.password, backup_path, &[])
        .arg("psql")
        .connection(dest)
        .arg("-d")
        .arg(&dest.database)
        .arg("-a")
        .arg("-f")
        .arg(backup_file(file))
}
