//! Frame analysis facade.
//!
//! [`VideoProcessor`] bundles the metric engine, feature extractor, predictor
//! and optimizer behind the four frame operations exposed to callers.

use crate::cache::{CacheStats, FeatureCache};
use crate::edges::EdgeThresholds;
use crate::error::{AdvisorError, Result};
use crate::features::{FeatureExtractor, FeatureVector};
use crate::model::{LinearQualityModel, ModelInfo, ModelWeights, QualityPredictor};
use crate::optimizer::{CompressionParams, ParameterOptimizer, SearchGrid};
use crate::presets::QualityPreset;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};
use vidopt_core::RasterFrame;
use vidopt_quality::{Psnr, PsnrConfig, Ssim, SsimConfig};

/// Processor configuration.
///
/// Model weights are not part of the configuration; inject them with
/// [`VideoProcessor::with_weights`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// SSIM settings.
    pub ssim: SsimConfig,
    /// PSNR settings.
    pub psnr: PsnrConfig,
    /// Edge detector thresholds.
    pub edges: EdgeThresholds,
    /// Optimizer search grid.
    pub grid: SearchGrid,
    /// Preset whose encoder speed is reported by the optimizer.
    pub preset: QualityPreset,
    /// Maximum cached feature vectors.
    pub cache_capacity: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            ssim: SsimConfig::default(),
            psnr: PsnrConfig::default(),
            edges: EdgeThresholds::default(),
            grid: SearchGrid::default(),
            preset: QualityPreset::Medium,
            cache_capacity: 16,
        }
    }
}

impl ProcessorConfig {
    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref()).map_err(vidopt_core::Error::from)?;
        Self::from_json(&json)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate all sections.
    pub fn validate(&self) -> Result<()> {
        self.ssim.validate()?;
        self.grid.validate()?;
        self.edges.validate()?;
        if !self.psnr.identical_threshold.is_finite() || self.psnr.identical_threshold < 0.0 {
            return Err(AdvisorError::ConfigError(
                "PSNR identity threshold must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }

    /// Set the reported preset.
    pub fn with_preset(mut self, preset: QualityPreset) -> Self {
        self.preset = preset;
        self
    }

    /// Set the cache capacity.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }
}

/// Stateful front end for frame analysis and parameter recommendation.
///
/// Not meant to be shared across threads: `analyze_frame` updates the
/// working frame and the feature cache.
#[derive(Debug)]
pub struct VideoProcessor {
    psnr: Psnr,
    ssim: Ssim,
    extractor: FeatureExtractor,
    optimizer: ParameterOptimizer<LinearQualityModel>,
    cache: FeatureCache,
    last_frame: Option<RasterFrame>,
    last_features: Option<FeatureVector>,
}

impl Default for VideoProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoProcessor {
    /// Create a processor with default configuration and placeholder weights.
    pub fn new() -> Self {
        let config = ProcessorConfig::default();
        let extractor = FeatureExtractor::with_thresholds(config.edges);
        Self {
            psnr: Psnr::new(config.psnr),
            ssim: Ssim::default(),
            optimizer: ParameterOptimizer::new(extractor.clone(), LinearQualityModel::placeholder()),
            extractor,
            cache: FeatureCache::new(config.cache_capacity),
            last_frame: None,
            last_features: None,
        }
    }

    /// Create a processor from a configuration.
    pub fn with_config(config: ProcessorConfig) -> Result<Self> {
        config.validate()?;
        let extractor = FeatureExtractor::with_thresholds(config.edges);
        let optimizer = ParameterOptimizer::new(extractor.clone(), LinearQualityModel::placeholder())
            .with_grid(config.grid)?
            .with_preset(config.preset);

        Ok(Self {
            psnr: Psnr::new(config.psnr),
            ssim: Ssim::new(config.ssim)?,
            extractor,
            optimizer,
            cache: FeatureCache::new(config.cache_capacity),
            last_frame: None,
            last_features: None,
        })
    }

    /// Replace the predictor weights.
    pub fn with_weights(mut self, weights: ModelWeights) -> Self {
        self.optimizer = self
            .optimizer
            .with_predictor(LinearQualityModel::new(weights));
        self
    }

    /// Extract features from a frame and keep it as the working frame.
    pub fn analyze_frame(&mut self, frame: &RasterFrame) -> FeatureVector {
        let digest = frame.digest();
        let extractor = &self.extractor;
        let features = self
            .cache
            .get_or_insert_with(digest, || extractor.extract(frame));

        debug!("Analyzed frame {} ({})", digest, frame.shape());
        self.last_frame = Some(frame.clone());
        self.last_features = Some(features);
        features
    }

    /// PSNR between two frames, or the sentinel for identical frames.
    pub fn calculate_psnr(&self, reference: &RasterFrame, distorted: &RasterFrame) -> Result<f64> {
        Ok(self.psnr.calculate(reference, distorted)?.psnr)
    }

    /// Mean SSIM between two frames.
    pub fn calculate_ssim(&self, reference: &RasterFrame, distorted: &RasterFrame) -> Result<f64> {
        Ok(self.ssim.calculate(reference, distorted)?.ssim)
    }

    /// Recommend compression parameters for a frame.
    ///
    /// The frame becomes the working frame, and its features come from the cache when present.
    pub fn optimize_parameters(
        &mut self,
        frame: &RasterFrame,
        target_quality: f64,
    ) -> Result<CompressionParams> {
        let features = self.analyze_frame(frame);
        let params = self
            .optimizer
            .optimize_features(&features, frame.shape(), target_quality)?;
        info!(
            "Recommended {} bps at {}x{} for target {:.3}",
            params.bitrate, params.width, params.height, target_quality
        );
        Ok(params)
    }

    /// Most recently analyzed frame.
    pub fn last_frame(&self) -> Option<&RasterFrame> {
        self.last_frame.as_ref()
    }

    /// Features of the most recently analyzed frame.
    pub fn last_features(&self) -> Option<&FeatureVector> {
        self.last_features.as_ref()
    }

    /// Feature cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Predictor description.
    pub fn model_info(&self) -> ModelInfo {
        self.optimizer.predictor().model_info()
    }
}
