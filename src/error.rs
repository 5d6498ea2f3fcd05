//! Error taxonomy for the library.
//!
//! Only I/O, configuration, discovery and grammar errors ever abort a run.
//! Parse and JSON errors are caught per file and degrade that file's
//! rendering.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CondenseError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not build a syntax tree for {0}")]
    Parse(String),

    #[error("Swift grammar failed to load: {0}")]
    Grammar(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("cannot list files under {path}: {message}")]
    Discovery { path: PathBuf, message: String },
}

impl CondenseError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CondenseError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CondenseError>;
