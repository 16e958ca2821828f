//! Error taxonomy for a conversion run.
//!
//! Modules return `anyhow::Result` with context attached the usual way; the
//! variants here mark which stage of the run failed so the caller can tell a
//! usage problem from an unreadable workbook or a failed write.

use std::path::PathBuf;

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("{0}")]
    Usage(String),
    #[error("failed to read spreadsheet {path:?}")]
    InputRead {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("invalid schema registry: {0}")]
    Schema(String),
    #[error("failed to write {path:?}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    pub fn input_read(path: impl Into<PathBuf>, source: anyhow::Error) -> Self {
        ConvertError::InputRead {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn output_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::OutputWrite {
            path: path.into(),
            source,
        }
    }
}
