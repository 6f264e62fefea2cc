//! Error types

use thiserror::Error;

/// Failures of the persistence backends
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum QuoteError {
    /// Rejected user input, nothing changed
    #[error("{0}")]
    Validation(String),

    /// Imported content is not a JSON array of quotes
    #[error("Invalid file format: {0}")]
    Format(String),

    #[error("Server error: {0}")]
    Remote(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<reqwest::Error> for QuoteError {
    fn from(e: reqwest::Error) -> Self {
        QuoteError::Remote(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, QuoteError>;
