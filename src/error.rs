//! Error types for Synheart Synth

use thiserror::Error;

/// Errors that can occur while generating or serving synthetic data
#[derive(Debug, Error)]
pub enum SynthError {
    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Device is not authenticated: {0}")]
    NotAuthenticated(String),

    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),

    #[error("Real data fetch failed: {0}")]
    Fetch(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}
