//! Error types for the populate layer.

use drift_core::ConfigError;
use drift_generator::GenerationError;
use thiserror::Error;

/// Errors that can occur while writing a run to disk.
#[derive(Error, Debug)]
pub enum PopulateError {
    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The generator stopped.
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
