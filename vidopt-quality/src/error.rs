//! Quality metric error types.

use thiserror::Error;
use vidopt_core::RasterFrame;

/// Quality metric errors.
#[derive(Debug, Error)]
pub enum QualityError {
    /// Dimension mismatch between reference and distorted frames.
    #[error("Dimension mismatch: reference {reference}, distorted {distorted}")]
    DimensionMismatch {
        reference: String,
        distorted: String,
    },

    /// Invalid parameter value.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl QualityError {
    /// Build a mismatch error from two frames.
    pub(crate) fn mismatch(reference: &RasterFrame, distorted: &RasterFrame) -> Self {
        QualityError::DimensionMismatch {
            reference: reference.shape().to_string(),
            distorted: distorted.shape().to_string(),
        }
    }
}

impl From<QualityError> for vidopt_core::Error {
    fn from(e: QualityError) -> Self {
        match e {
            QualityError::DimensionMismatch {
                reference,
                distorted,
            } => vidopt_core::Error::DimensionMismatch {
                reference,
                distorted,
            },
            QualityError::InvalidParameter(msg) => vidopt_core::Error::InvalidParameter(msg),
        }
    }
}

/// Result type for quality metrics.
pub type Result<T> = std::result::Result<T, QualityError>;

/// Reject frame pairs that cannot be compared sample by sample.
pub(crate) fn validate_pair(reference: &RasterFrame, distorted: &RasterFrame) -> Result<()> {
    if !reference.same_shape(distorted) {
        return Err(QualityError::mismatch(reference, distorted));
    }
    Ok(())
}
