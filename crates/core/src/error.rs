use std::path::PathBuf;

use crate::units::UnitError;

/// Everything that can stop a check from producing its measurements.
///
/// The check runner turns any of these into a critical status line, so
/// the variants carry just enough context for a one-line diagnostic.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("No such file or directory: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("command not found: {program}")]
    CommandNotFound { program: String },

    #[error("parse failure: {0}")]
    ParseFailure(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("error call command: {command} (exit code {exit_code:?})")]
    SubprocessFailure {
        command: String,
        exit_code: Option<i32>,
    },

    #[error("command timed out after {secs}s: {command}")]
    Timeout { command: String, secs: u64 },

    #[error("invalid size: {0}")]
    Unit(#[from] UnitError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CheckError {
    /// Map an I/O error on `path` to [`CheckError::MissingInput`] when the
    /// path does not exist, keeping every other kind as [`CheckError::Io`].
    pub fn from_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            CheckError::MissingInput(path.into())
        } else {
            CheckError::Io(err)
        }
    }
}
