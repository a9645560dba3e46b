// src/error.rs
//! Error types for the positioning statistics tool

use std::fmt;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, StatsError>;

#[derive(Debug)]
pub enum StatsError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// File missing or without a single usable line.
    EmptyInput(PathBuf),
    /// A required time or numeric field could not be read. Fatal for the file.
    MalformedRecord {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    /// Missing or invalid settings. Fatal for the whole run.
    Configuration(String),
}

impl StatsError {
    pub fn malformed(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        StatsError::MalformedRecord {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        StatsError::Configuration(msg.into())
    }

    /// Configuration failures abort a run, everything else is file scoped.
    pub fn is_fatal(&self) -> bool {
        matches!(self, StatsError::Configuration(_))
    }
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsError::Io(e) => write!(f, "IO error: {}", e),
            StatsError::Json(e) => write!(f, "JSON error: {}", e),
            StatsError::EmptyInput(path) => write!(f, "No data in {}", path.display()),
            StatsError::MalformedRecord { path, line, reason } => {
                write!(f, "Malformed record in {} (line {}): {}", path.display(), line, reason)
            }
            StatsError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for StatsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StatsError::Io(e) => Some(e),
            StatsError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StatsError {
    fn from(error: std::io::Error) -> Self {
        StatsError::Io(error)
    }
}

impl From<serde_json::Error> for StatsError {
    fn from(error: serde_json::Error) -> Self {
        StatsError::Json(error)
    }
}
