use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Failed to decode {path:?}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("Failed to encode {path:?}: {message}")]
    Encode { path: PathBuf, message: String },

    #[error("Converted but failed to remove original {path:?}: {message}")]
    Replace { path: PathBuf, message: String },

    #[error("Traversal error: {0}")]
    Traversal(#[from] walkdir::Error),

    #[error("Invalid quality value: {0}. Must be between 0 and 100")]
    InvalidQuality(u8),

    #[error("Invalid worker count: {0}. Must be at least 1")]
    InvalidWorkerCount(usize),

    #[error("Input directory not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Input path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ConvertError {
    pub fn decode(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        ConvertError::Decode {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn encode(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        ConvertError::Encode {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn replace(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        ConvertError::Replace {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Short tag used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            ConvertError::Decode { .. } => "decode",
            ConvertError::Encode { .. } => "encode",
            ConvertError::Replace { .. } => "replace",
            ConvertError::Traversal(_) => "traversal",
            ConvertError::InvalidQuality(_) | ConvertError::InvalidWorkerCount(_) => "config",
            ConvertError::RootNotFound(_) | ConvertError::NotADirectory(_) => "root",
            ConvertError::ThreadPool(_) => "pool",
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
