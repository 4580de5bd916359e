use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Application-wide error types for slugharvest.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A slug could not be decoded, or a base is out of range.
    #[error("Invalid slug: {0}")]
    InvalidSlug(String),

    /// A harvester or client was configured with unusable values.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Writing fetched content to disk failed.
    #[error("Storage error at {}: {source}", .path.display())]
    StorageError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
