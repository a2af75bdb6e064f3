use std::path::PathBuf;

use thiserror::Error;

/// Failures that end a janitor run.
///
/// Everything recoverable (bad version names, odd artifact counts, a
/// directory that refuses to go away) is recorded as a diagnostic on the
/// package report instead; only these escalate.
#[derive(Debug, Error)]
pub enum JanitorError {
    /// No `--source` was supplied
    #[error("Invalid config. Try --help (no package source was given)")]
    MissingSource,

    /// The source root does not exist or is not a directory
    #[error("Package source '{}' is not a directory", .path.display())]
    SourceNotFound { path: PathBuf },

    /// The source root could not be listed
    #[error("I/O error at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The run log could not be created or written
    #[error("Run log '{}' is unavailable: {source}", .path.display())]
    Log {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is invalid
    #[error("Config error in '{}': {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl JanitorError {
    /// Whether this is a user-facing configuration problem rather than a
    /// runtime failure.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            JanitorError::MissingSource
                | JanitorError::SourceNotFound { .. }
                | JanitorError::Config { .. }
        )
    }
}

pub type Result<T, E = JanitorError> = std::result::Result<T, E>;
