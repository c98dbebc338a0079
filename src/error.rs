//! Error types for place-picker

use thiserror::Error;

/// Main error type for place-picker operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),

    /// Location permission denied, restricted, or the provider could not
    /// produce a fix
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    /// Network or provider failure while searching for places
    #[error("Search failed: {0}")]
    SearchFailed(String),
}

/// Result type alias for place-picker operations
pub type Result<T> = std::result::Result<T, Error>;
