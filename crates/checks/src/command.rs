//! External command execution.
//!
//! Checks read the stdout of tools such as `borg`, `smartctl` or
//! `omreport`. A command runs with stdin closed and is killed if it does
//! not finish within its timeout.

use std::process::Stdio;
use std::time::Duration;

use nagcheck_core::CheckError;
use tokio::process::Command;

use crate::cli::DEFAULT_TIMEOUT_SECS;

/// An external command whose stdout is the check's input.
#[derive(Debug, Clone)]
pub struct ExternalCommand {
    program: String,
    args: Vec<String>,
    envs: Vec<(String, String)>,
    timeout: Duration,
}

impl ExternalCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child process only.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Command line as shown in diagnostics.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the command and return its stdout.
    ///
    /// A non-zero exit status is a [`CheckError::SubprocessFailure`]; the
    /// child's stderr is only logged.
    pub async fn stdout(&self) -> Result<String, CheckError> {
        let command_line = self.display();
        tracing::debug!(command = %command_line, "Running external command");

        let result = tokio::time::timeout(
            self.timeout,
            Command::new(&self.program)
                .args(&self.args)
                .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                .stdin(Stdio::null())
                .kill_on_drop(true)
                .output(),
        )
        .await;

        match result {
            Ok(Ok(output)) if output.status.success() => {
                Ok(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Ok(Ok(output)) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                tracing::warn!(
                    command = %command_line,
                    exit_code = ?output.status.code(),
                    stderr = %stderr.trim(),
                    "External command failed",
                );
                Err(CheckError::SubprocessFailure {
                    command: command_line,
                    exit_code: output.status.code(),
                })
            }
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CheckError::CommandNotFound {
                    program: self.program.clone(),
                })
            }
            Ok(Err(e)) => Err(CheckError::Io(e)),
            Err(_) => {
                tracing::error!(command = %command_line, "External command timed out");
                Err(CheckError::Timeout {
                    command: command_line,
                    secs: self.timeout.as_secs(),
                })
            }
        }
    }
}
