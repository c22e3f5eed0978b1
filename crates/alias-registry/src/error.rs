//! Error types for alias registry operations

use std::path::PathBuf;
use thiserror::Error;

/// Result type for alias registry operations
pub type AliasResult<T> = Result<T, AliasError>;

/// Errors raised by the alias registry and its persistence layer
///
/// Adding a duplicate alias or removing something that does not exist is not
/// an error; those operations report the outcome through their return value.
#[derive(Debug, Error)]
pub enum AliasError {
    /// A working directory value outside `default` / `map`
    #[error("invalid working_directory string \"{value}\"")]
    InvalidWorkingDirectory { value: String },

    /// File read/write/rename failed
    #[error("IO error on {path} ({operation}): {source}")]
    Io {
        path: PathBuf,
        operation: IoOperation,
        source: std::io::Error,
    },

    /// The JSON document could not be rendered
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No location could be determined for the aliases file
    #[error("Path resolution failed: {message}")]
    PathResolution { message: String },
}

/// IO operation type for error context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOperation {
    Read,
    Write,
    Delete,
    Move,
    CreateDir,
}

impl std::fmt::Display for IoOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoOperation::Read => write!(f, "read"),
            IoOperation::Write => write!(f, "write"),
            IoOperation::Delete => write!(f, "delete"),
            IoOperation::Move => write!(f, "move"),
            IoOperation::CreateDir => write!(f, "create directory"),
        }
    }
}

impl AliasError {
    /// Create an IO error
    pub fn io(path: impl Into<PathBuf>, operation: IoOperation, source: std::io::Error) -> Self {
        AliasError::Io {
            path: path.into(),
            operation,
            source,
        }
    }

    /// Create an invalid working directory error
    pub fn invalid_working_directory(value: impl Into<String>) -> Self {
        AliasError::InvalidWorkingDirectory {
            value: value.into(),
        }
    }

    /// Create a path resolution error
    pub fn path_resolution(message: impl Into<String>) -> Self {
        AliasError::PathResolution {
            message: message.into(),
        }
    }

    /// The IO operation that failed, if this is an IO error
    pub fn io_operation(&self) -> Option<IoOperation> {
        match self {
            AliasError::Io { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}
