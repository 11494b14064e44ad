//! Error types for cgviz.

use thiserror::Error;

/// The main error type for cgviz operations.
#[derive(Error, Debug)]
pub enum CgvizError {
    /// An input record could not be decoded.
    #[error("invalid record '{key}': {reason}")]
    InvalidRecord { key: String, reason: String },

    /// Geometry could not be built from the given values.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Rendering error.
    #[error("render error: {0}")]
    Render(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for cgviz operations.
pub type Result<T> = std::result::Result<T, CgvizError>;
