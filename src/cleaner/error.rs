// Centralized error handling for the cleaner
// Every variant carries the path and operation it failed on

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cleaning runs
#[derive(Debug, Error)]
pub enum CleanError {
    #[error("File not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error(
        "Directory not found: {}\nSuggestion: Check that --path points to an existing directory",
        .path.display()
    )]
    DirectoryNotFound { path: PathBuf },

    #[error(
        "Not a directory: {}\nSuggestion: --path must name a directory, not a file",
        .path.display()
    )]
    NotADirectory { path: PathBuf },

    #[error("Permission denied while {operation} {}", .path.display())]
    PermissionDenied { path: PathBuf, operation: String },

    #[error("{}", io_message(.path.as_ref(), .operation, .source))]
    Io {
        path: Option<PathBuf>,
        operation: String,
        #[source]
        source: io::Error,
    },

    /// Kept file is not valid UTF-8 text
    #[error("Cannot decode {} as UTF-8 text", .path.display())]
    Decode { path: PathBuf },

    #[error(
        "Invalid configuration in {}: {reason}\nSuggestion: Check the TOML syntax and key names",
        .path.display()
    )]
    Config { path: PathBuf, reason: String },

    #[error("Invalid comment syntax: {reason}")]
    InvalidCommentSyntax { reason: String },
}

fn io_message(path: Option<&PathBuf>, operation: &str, source: &io::Error) -> String {
    match path {
        Some(p) => format!("I/O error while {} {}: {}", operation, p.display(), source),
        None => format!("I/O error while {}: {}", operation, source),
    }
}

impl CleanError {
    /// Create an error with context about the operation and optional path
    pub fn from_io_error(err: io::Error, operation: &str, path: Option<PathBuf>) -> Self {
        match (err.kind(), path) {
            (io::ErrorKind::NotFound, Some(p)) => {
                if operation.contains("directory") {
                    CleanError::DirectoryNotFound { path: p }
                } else {
                    CleanError::FileNotFound { path: p }
                }
            }
            (io::ErrorKind::PermissionDenied, Some(p)) => CleanError::PermissionDenied {
                path: p,
                operation: operation.to_string(),
            },
            (io::ErrorKind::InvalidData, Some(p)) if operation.starts_with("reading") => {
                CleanError::Decode { path: p }
            }
            (_, path) => CleanError::Io {
                path,
                operation: operation.to_string(),
                source: err,
            },
        }
    }
}

impl From<io::Error> for CleanError {
    fn from(err: io::Error) -> Self {
        CleanError::from_io_error(err, "unknown operation", None)
    }
}
