//! Error types for the parameter advisor.

use thiserror::Error;

/// Error type for advisor operations.
#[derive(Error, Debug)]
pub enum AdvisorError {
    /// Weight vector does not match the feature layout.
    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    /// Invalid parameter value.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Predictor produced an unusable value.
    #[error("Prediction error: {0}")]
    Prediction(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Frame boundary error.
    #[error(transparent)]
    Frame(#[from] vidopt_core::Error),

    /// Quality metric error.
    #[error("Quality error: {0}")]
    Quality(#[from] vidopt_quality::QualityError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for advisor operations.
pub type Result<T> = std::result::Result<T, AdvisorError>;
