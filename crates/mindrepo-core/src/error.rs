//! Error types for MindRepo

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The activity history was empty when an insight was requested
    #[error("Not enough data to generate insights")]
    InsufficientData,

    /// A stored commit carries a timestamp that cannot be parsed or ordered
    #[error("Commit {id} has malformed timestamp: {timestamp:?}")]
    MalformedRecord { id: i64, timestamp: String },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
