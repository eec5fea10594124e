//! Error types for lcd-pta
//!
//! Invariant violations inside the engine (stale handles, duplicate edges)
//! are assertions, not errors. This type covers the fallible edges of the
//! crate: configuration, file output, and name lookups.

use crate::config::ConfigError;
use thiserror::Error;

/// Main error type for lcd-pta operations
#[derive(Debug, Error)]
pub enum PtaError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Constraint dump (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A name that no constraint ever mentioned
    #[error("Unknown location '{0}'")]
    UnknownLocation(String),
}

impl PtaError {
    /// Create an unknown-location error
    pub fn unknown_location(name: impl Into<String>) -> Self {
        PtaError::UnknownLocation(name.into())
    }
}

/// Result type alias for lcd-pta operations
pub type Result<T> = std::result::Result<T, PtaError>;
