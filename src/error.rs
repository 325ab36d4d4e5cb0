use crate::models::Level;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading reference tables or configuration.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("location table not found: {}", .path.display())]
    MissingTable { path: PathBuf },

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {table} table: {source}")]
    Parse {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Rejected selection-state transitions. The state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("{level} is locked until a {parent} is selected")]
    LevelLocked { level: Level, parent: Level },

    #[error("{level} `{code}` does not belong to the selected {parent} `{expected}`")]
    ParentMismatch {
        level: Level,
        code: String,
        parent: Level,
        expected: String,
    },

    #[error("no {level} with code `{code}`")]
    UnknownCode { level: Level, code: String },
}
