//! Error types for the kampanya-core library.
//!
//! Extraction itself never fails: a field that cannot be found is `None`.
//! These errors cover the configuration layer around the engine.

use thiserror::Error;

/// Main error type for the kampanya library.
#[derive(Error, Debug)]
pub enum KampanyaError {
    /// Configuration is structurally valid JSON but semantically wrong.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for the kampanya library.
pub type Result<T> = std::result::Result<T, KampanyaError>;
