//! Quality prediction from frame features.

use crate::error::{AdvisorError, Result};
use crate::features::{FeatureVector, FEATURE_LEN};
use serde::{Deserialize, Serialize};

/// Fixed-length weight vector for the linear predictor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelWeights([f64; FEATURE_LEN]);

impl Default for ModelWeights {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

impl ModelWeights {
    /// Every weight set to `value`.
    pub fn uniform(value: f64) -> Self {
        Self([value; FEATURE_LEN])
    }

    /// Wrap a raw array.
    pub fn from_array(weights: [f64; FEATURE_LEN]) -> Self {
        Self(weights)
    }

    /// Build weights from a slice, which must hold exactly 128 finite values.
    pub fn from_slice(weights: &[f64]) -> Result<Self> {
        let array: [f64; FEATURE_LEN] = weights.try_into().map_err(|_| {
            AdvisorError::InvalidWeights(format!(
                "Expected {} weights, got {}",
                FEATURE_LEN,
                weights.len()
            ))
        })?;

        if let Some(i) = array.iter().position(|w| !w.is_finite()) {
            return Err(AdvisorError::InvalidWeights(format!(
                "Weight {} is not finite",
                i
            )));
        }

        Ok(Self(array))
    }

    /// Weights as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Weights as a fixed-size array.
    pub fn as_array(&self) -> &[f64; FEATURE_LEN] {
        &self.0
    }
}

/// Model information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub version: String,
    pub trained_on: String,
}

/// Predicts a normalized quality score for a frame.
pub trait QualityPredictor: Send + Sync {
    /// Predict quality in `[0, 1]`.
    fn predict(&self, features: &FeatureVector) -> f64;

    /// Get model name/version.
    fn model_info(&self) -> ModelInfo;
}

/// Linear placeholder model: clamped dot product of features and weights.
///
/// There is no training path; weights are fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct LinearQualityModel {
    weights: ModelWeights,
}

impl LinearQualityModel {
    /// Create a model with the given weights.
    pub fn new(weights: ModelWeights) -> Self {
        Self { weights }
    }

    /// Model with every weight set to 1.0.
    pub fn placeholder() -> Self {
        Self::default()
    }

    /// Weights in use.
    pub fn weights(&self) -> &ModelWeights {
        &self.weights
    }
}

impl QualityPredictor for LinearQualityModel {
    fn predict(&self, features: &FeatureVector) -> f64 {
        features.dot(self.weights.as_array()).clamp(0.0, 1.0)
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            name: "LinearQualityModel".to_string(),
            version: "1.0.0".to_string(),
            trained_on: "none".to_string(),
        }
    }
}

impl<P: QualityPredictor + ?Sized> QualityPredictor for Box<P> {
    fn predict(&self, features: &FeatureVector) -> f64 {
        (**self).predict(features)
    }

    fn model_info(&self) -> ModelInfo {
        (**self).model_info()
    }
}
