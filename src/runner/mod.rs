pub mod docker;

use anyhow::Context;
use std::path::PathBuf;
use tokio::process::Command;
use which::which;

use crate::errors::{AppError, Result};
use crate::utils::progress::Spinner;
pub use docker::ToolCommand;

/// Runs one external step to completion and reports it on the step's spinner.
pub trait CommandRunner {
    /// Returns captured stdout on success, `AppError::ExternalTool` otherwise.
    async fn run(&mut self, command: &ToolCommand, spinner: &Spinner, label: &str)
    -> Result<String>;
}

/// Finds the docker executable in the system PATH.
fn find_docker_executable() -> anyhow::Result<PathBuf> {
    which("docker").context(
        "docker executable not found in PATH. Please ensure Docker is installed and in your PATH.",
    )
}

pub struct DockerRunner {
    docker_path: PathBuf,
}

impl DockerRunner {
    pub fn new() -> anyhow::Result<Self> {
        let docker_path = find_docker_executable()?;
        log::debug!("Found docker executable at: {}", docker_path.display());
        Ok(DockerRunner { docker_path })
    }
}

impl CommandRunner for DockerRunner {
    async fn run(
        &mut self,
        command: &ToolCommand,
        spinner: &Spinner,
        label: &str,
    ) -> Result<String> {
        log::debug!("Executing {}: {}", label, command);

        // stdout is buffered whole: it is the step's result, and `psql -a` echoes the full script.
        let output = Command::new(&self.docker_path)
            .args(command.args())
            .envs(command.env().iter().map(|(k, v)| (k, v)))
            .output()
            .await;

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                spinner.fail(label);
                return Err(AppError::external(
                    label,
                    format!("could not launch docker: {}", e),
                ));
            }
        };

        if !output.status.success() {
            spinner.fail(label);
            return Err(AppError::external(
                label,
                format!(
                    "exited with {}\nStderr: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        spinner.succeed(label);
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectionParams;

    fn restore_command() -> ToolCommand {
        let dest = ConnectionParams {
            host: "localhost".to_string(),
            port: "5432".to_string(),
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            database: "shop".to_string(),
        };
        docker::psql_restore(&dest, "/b", "s.sql")
    }

    async fn run_with(program: &str) -> Result<String> {
        let mut runner = DockerRunner {
            docker_path: PathBuf::from(program),
        };
        let spinner = Spinner::start("Starting test step");
        runner.run(&restore_command(), &spinner, "Restore schema").await
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_external_tool_error() {
        let err = run_with("false").await.unwrap_err();
        assert!(matches!(
            err,
            AppError::ExternalTool { ref label, ref detail }
                if label == "Restore schema" && detail.contains("exited with")
        ));
    }

    #[tokio::test]
    async fn test_launch_failure_is_external_tool_error() {
        let err = run_with("/nonexistent/pgshuttle-docker").await.unwrap_err();
        assert!(matches!(
            err,
            AppError::ExternalTool { ref detail, .. } if detail.contains("could not launch")
        ));
    }

    #[tokio::test]
    async fn test_success_returns_captured_stdout() -> Result<()> {
        let stdout = run_with("echo").await?;
        assert_eq!(stdout.trim_end(), restore_command().args().join(" "));
        Ok(())
    }
}
