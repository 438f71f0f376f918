//! Per-file scan errors and the diagnostics that carry them

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Error raised while reading or parsing a single source file.
///
/// These never abort a scan: the coordinator records a [`Diagnostic`]
/// for the offending file and moves on to the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileError {
    /// The Python grammar rejected the file contents.
    #[error("syntax error")]
    Parse,
    /// The file could not be read as UTF-8 text (binary content,
    /// wrong encoding, or an I/O failure while reading).
    #[error("decode error: {0}")]
    Decode(String),
    /// The file is larger than the configured extraction limit.
    #[error("file exceeds size limit ({0} bytes)")]
    TooLarge(u64),
}

/// A non-fatal problem encountered during a scan, tied to one path.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub path: PathBuf,
    pub message: String,
}

impl Diagnostic {
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn from_error(path: impl Into<PathBuf>, err: &FileError) -> Self {
        let message = match err {
            FileError::Parse => "syntax error; skipping file".to_string(),
            FileError::Decode(_) => "unable to decode file; skipping".to_string(),
            FileError::TooLarge(limit) => {
                format!("file exceeds size limit ({} bytes); skipping", limit)
            }
        };
        Self::new(path, message)
    }
}
