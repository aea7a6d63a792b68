//! Grid search over encoder bitrate and output scale.
//!
//! The predicted quality comes from the frame's features alone, so every
//! candidate scores the same distance to the target. With the strict
//! comparison used here the first candidate (lowest bitrate, smallest
//! scale) is always selected. Callers depend on this ordering.

use crate::error::{AdvisorError, Result};
use crate::features::{FeatureExtractor, FeatureVector};
use crate::model::{LinearQualityModel, QualityPredictor};
use crate::presets::QualityPreset;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};
use vidopt_core::{FrameShape, RasterFrame};

/// Candidate grid, iterated bitrate-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchGrid {
    /// Bitrates in bits per second.
    pub bitrates: Vec<u64>,
    /// Output scale factors in `(0, 1]`.
    pub scales: Vec<f64>,
}

impl Default for SearchGrid {
    fn default() -> Self {
        Self {
            bitrates: vec![1_000_000, 2_000_000, 4_000_000, 8_000_000],
            scales: vec![0.5, 0.75, 1.0],
        }
    }
}

impl SearchGrid {
    /// Check that the grid is non-empty and every scale lies in `(0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if self.bitrates.is_empty() || self.scales.is_empty() {
            return Err(AdvisorError::ConfigError(
                "Search grid needs at least one bitrate and one scale".to_string(),
            ));
        }
        if self.bitrates.contains(&0) {
            return Err(AdvisorError::ConfigError("Bitrates must be positive".to_string()));
        }
        if let Some(s) = self.scales.iter().find(|s| !(**s > 0.0 && **s <= 1.0)) {
            return Err(AdvisorError::ConfigError(format!(
                "Scale {} outside (0, 1]",
                s
            )));
        }
        Ok(())
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.bitrates.len() * self.scales.len()
    }

    /// True when the grid holds no candidates.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One grid point resolved against a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candidate {
    pub bitrate: u64,
    pub scale: f64,
    pub width: u32,
    pub height: u32,
}

/// Recommended encoder parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionParams {
    /// Bitrate in bits per second.
    pub bitrate: u64,
    /// Output width.
    pub width: u32,
    /// Output height.
    pub height: u32,
    /// Encoder speed preset name.
    pub preset: String,
    /// Predicted quality of the frame, in `[0, 1]`.
    pub target_quality: f64,
}

impl fmt::Display for CompressionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CompressionParams(bitrate={}, width={}, height={}, preset='{}', target_quality={})",
            self.bitrate, self.width, self.height, self.preset, self.target_quality
        )
    }
}

/// Picks compression parameters for a frame against a quality target.
#[derive(Debug, Clone)]
pub struct ParameterOptimizer<P: QualityPredictor = LinearQualityModel> {
    extractor: FeatureExtractor,
    predictor: P,
    grid: SearchGrid,
    preset: QualityPreset,
}

impl Default for ParameterOptimizer {
    fn default() -> Self {
        Self::new(FeatureExtractor::new(), LinearQualityModel::placeholder())
    }
}

impl<P: QualityPredictor> ParameterOptimizer<P> {
    /// Create an optimizer with the default grid and the medium preset.
    pub fn new(extractor: FeatureExtractor, predictor: P) -> Self {
        Self {
            extractor,
            predictor,
            grid: SearchGrid::default(),
            preset: QualityPreset::Medium,
        }
    }

    /// Replace the search grid.
    pub fn with_grid(mut self, grid: SearchGrid) -> Result<Self> {
        grid.validate()?;
        self.grid = grid;
        Ok(self)
    }

    /// Set the preset whose encoder speed is reported.
    pub fn with_preset(mut self, preset: QualityPreset) -> Self {
        self.preset = preset;
        self
    }

    /// Swap the predictor, keeping the grid and preset.
    pub fn with_predictor<Q: QualityPredictor>(self, predictor: Q) -> ParameterOptimizer<Q> {
        ParameterOptimizer {
            extractor: self.extractor,
            predictor,
            grid: self.grid,
            preset: self.preset,
        }
    }

    /// Reported preset.
    pub fn preset(&self) -> QualityPreset {
        self.preset
    }

    /// Search grid in use.
    pub fn grid(&self) -> &SearchGrid {
        &self.grid
    }

    /// Predictor in use.
    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    /// Enumerate the grid for a frame, bitrate-major.
    pub fn candidates(&self, frame: &RasterFrame) -> Vec<Candidate> {
        self.candidates_for(frame.shape())
    }

    /// Enumerate the grid for a frame of the given shape, bitrate-major.
    pub fn candidates_for(&self, shape: FrameShape) -> Vec<Candidate> {
        let cols = shape.cols as f64;
        let rows = shape.rows as f64;

        self.grid
            .bitrates
            .iter()
            .flat_map(|&bitrate| {
                self.grid.scales.iter().map(move |&scale| Candidate {
                    bitrate,
                    scale,
                    width: (cols * scale).floor() as u32,
                    height: (rows * scale).floor() as u32,
                })
            })
            .collect()
    }

    /// Choose compression parameters for a frame.
    pub fn optimize(&self, frame: &RasterFrame, target_quality: f64) -> Result<CompressionParams> {
        check_target(target_quality)?;
        let features = self.extractor.extract(frame);
        self.optimize_features(&features, frame.shape(), target_quality)
    }

    /// Choose compression parameters from already extracted features.
    pub fn optimize_features(
        &self,
        features: &FeatureVector,
        shape: FrameShape,
        target_quality: f64,
    ) -> Result<CompressionParams> {
        check_target(target_quality)?;

        let mut best: Option<(Candidate, f64)> = None;
        let mut best_diff = f64::MAX;

        for candidate in self.candidates_for(shape) {
            let predicted = self.predictor.predict(features);
            if !predicted.is_finite() {
                return Err(AdvisorError::Prediction(format!(
                    "{} returned {}",
                    self.predictor.model_info().name,
                    predicted
                )));
            }

            let diff = (predicted - target_quality).abs();
            debug!(
                "Candidate {} bps at {:.2}x ({}x{}): predicted={:.4}, diff={:.4}",
                candidate.bitrate, candidate.scale, candidate.width, candidate.height, predicted, diff
            );

            if diff < best_diff {
                best_diff = diff;
                best = Some((candidate, predicted));
            }
        }

        let (candidate, predicted) = best.ok_or_else(|| {
            AdvisorError::InvalidParameter("No candidate within range of the target".to_string())
        })?;

        let params = CompressionParams {
            bitrate: candidate.bitrate,
            width: candidate.width,
            height: candidate.height,
            preset: self.preset.settings().preset,
            target_quality: predicted,
        };

        info!("Selected {}", params);
        Ok(params)
    }
}

fn check_target(target_quality: f64) -> Result<()> {
    if !target_quality.is_finite() {
        return Err(AdvisorError::InvalidParameter(format!(
            "Target quality must be finite, got {}",
            target_quality
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelInfo, ModelWeights};

    struct FixedPredictor(f64);

    impl QualityPredictor for FixedPredictor {
        fn predict(&self, _features: &FeatureVector) -> f64 {
            self.0
        }

        fn model_info(&self) -> ModelInfo {
            ModelInfo {
                name: "Fixed".to_string(),
                version: "0".to_string(),
                trained_on: "none".to_string(),
            }
        }
    }

    #[test]
    fn test_mid_gray_selects_first_candidate() {
        let frame = RasterFrame::filled(100, 100, [128, 128, 128]);
        let params = ParameterOptimizer::default().optimize(&frame, 0.9).unwrap();

        assert_eq!(params.bitrate, 1_000_000);
        assert_eq!(params.width, 50);
        assert_eq!(params.height, 50);
        assert_eq!(params.preset, "medium");
        // Three channel means of 128/255, clamped.
        assert_eq!(params.target_quality, 1.0);
    }

    #[test]
    fn test_result_independent_of_target() {
        let frame = RasterFrame::from_fn(37, 51, |r, c| [(r * 7) as u8, (c * 5) as u8, 90]);
        let optimizer = ParameterOptimizer::default();
        let a = optimizer.optimize(&frame, 0.0).unwrap();
        let b = optimizer.optimize(&frame, 0.5).unwrap();
        let c = optimizer.optimize(&frame, 42.0).unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!((a.width, a.height), (25, 18));
    }

    #[test]
    fn test_candidate_order() {
        let frame = RasterFrame::filled(10, 20, [0, 0, 0]);
        let candidates = ParameterOptimizer::default().candidates(&frame);
        assert_eq!(candidates.len(), 12);
        assert_eq!(candidates[0].bitrate, 1_000_000);
        assert_eq!(candidates[0].scale, 0.5);
        assert_eq!(candidates[1].scale, 0.75);
        assert_eq!(candidates[3].bitrate, 2_000_000);
        assert_eq!((candidates[1].width, candidates[1].height), (15, 7));
        assert_eq!(candidates[11].bitrate, 8_000_000);
        assert_eq!((candidates[11].width, candidates[11].height), (20, 10));
    }

    #[test]
    fn test_custom_predictor_and_preset() {
        let frame = RasterFrame::filled(8, 8, [1, 2, 3]);
        let optimizer = ParameterOptimizer::new(FeatureExtractor::new(), FixedPredictor(0.25))
            .with_preset(QualityPreset::High);
        let params = optimizer.optimize(&frame, 0.8).unwrap();
        assert_eq!(params.target_quality, 0.25);
        assert_eq!(params.preset, "slow");
        assert_eq!(params.bitrate, 1_000_000);
    }

    #[test]
    fn test_zero_weights() {
        let frame = RasterFrame::filled(4, 4, [200, 200, 200]);
        let optimizer = ParameterOptimizer::new(
            FeatureExtractor::new(),
            LinearQualityModel::new(ModelWeights::uniform(0.0)),
        );
        assert_eq!(optimizer.optimize(&frame, 0.5).unwrap().target_quality, 0.0);
    }

    #[test]
    fn test_rejects_non_finite_target() {
        let frame = RasterFrame::filled(4, 4, [0, 0, 0]);
        let optimizer = ParameterOptimizer::default();
        assert!(optimizer.optimize(&frame, f64::NAN).is_err());
        assert!(optimizer.optimize(&frame, f64::INFINITY).is_err());
    }

    #[test]
    fn test_grid_validation() {
        let optimizer = ParameterOptimizer::default();
        assert!(optimizer
            .clone()
            .with_grid(SearchGrid {
                bitrates: vec![],
                scales: vec![1.0],
            })
            .is_err());
        assert!(optimizer
            .clone()
            .with_grid(SearchGrid {
                bitrates: vec![500_000],
                scales: vec![1.5],
            })
            .is_err());

        let custom = optimizer
            .with_grid(SearchGrid {
                bitrates: vec![500_000],
                scales: vec![0.25],
            })
            .unwrap();
        let frame = RasterFrame::filled(40, 80, [0, 0, 0]);
        let params = custom.optimize(&frame, 0.5).unwrap();
        assert_eq!(params.bitrate, 500_000);
        assert_eq!((params.width, params.height), (20, 10));
    }

    #[test]
    fn test_non_finite_prediction_reported() {
        let frame = RasterFrame::filled(4, 4, [0, 0, 0]);
        for value in [f64::NAN, f64::INFINITY] {
            let optimizer = ParameterOptimizer::new(FeatureExtractor::new(), FixedPredictor(value));
            let err = optimizer.optimize(&frame, 0.5).unwrap_err();
            assert!(matches!(err, AdvisorError::Prediction(_)), "got {:?}", err);
        }
    }

    #[test]
    fn test_optimize_features_matches_optimize() {
        let frame = RasterFrame::from_fn(21, 33, |r, c| [(r * 9) as u8, (c * 3) as u8, 17]);
        let optimizer = ParameterOptimizer::default();
        let features = FeatureExtractor::new().extract(&frame);

        let direct = optimizer.optimize(&frame, 0.4).unwrap();
        let precomputed = optimizer
            .optimize_features(&features, frame.shape(), 0.4)
            .unwrap();
        assert_eq!(direct, precomputed);
        assert_eq!((precomputed.width, precomputed.height), (16, 10));
        assert!(optimizer
            .optimize_features(&features, frame.shape(), f64::NAN)
            .is_err());
    }

    #[test]
    fn test_display_format() {
        let params = CompressionParams {
            bitrate: 1_000_000,
            width: 50,
            height: 50,
            preset: "medium".to_string(),
            target_quality: 0.5,
        };
        assert_eq!(
            params.to_string(),
            "CompressionParams(bitrate=1000000, width=50, height=50, preset='medium', target_quality=0.5)"
        );
    }
}
