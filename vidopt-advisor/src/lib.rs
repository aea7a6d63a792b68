//! Frame analysis and encoder parameter recommendation for vidopt.
//!
//! This crate turns a single raster frame into a fixed-length feature vector,
//! scores it with a linear quality predictor and recommends compression
//! parameters from a small bitrate/scale grid.
//!
//! # Features
//!
//! - **Feature Extraction**: Per-channel mean and deviation plus edge density
//! - **Quality Prediction**: Clamped linear model with injectable weights
//! - **Parameter Search**: Grid search over bitrate and output scale
//! - **Presets**: Encoder quality presets and target resolutions
//!
//! # Example
//!
//! ```rust
//! use vidopt_advisor::VideoProcessor;
//! use vidopt_core::RasterFrame;
//!
//! let mut processor = VideoProcessor::new();
//! let frame = RasterFrame::filled(100, 100, [128, 128, 128]);
//!
//! let features = processor.analyze_frame(&frame);
//! assert_eq!(features.len(), 128);
//!
//! assert_eq!(processor.calculate_psnr(&frame, &frame).unwrap(), 100.0);
//!
//! let params = processor.optimize_parameters(&frame, 0.9).unwrap();
//! assert_eq!((params.width, params.height), (50, 50));
//! println!("{}", params);
//! ```
//!
//! # Custom Predictors
//!
//! ```rust
//! use vidopt_advisor::{
//!     FeatureExtractor, LinearQualityModel, ModelWeights, ParameterOptimizer, QualityPredictor,
//! };
//! use vidopt_core::RasterFrame;
//!
//! let model = LinearQualityModel::new(ModelWeights::uniform(0.25));
//! println!("Model: {} v{}", model.model_info().name, model.model_info().version);
//!
//! let optimizer = ParameterOptimizer::new(FeatureExtractor::new(), model);
//! let frame = RasterFrame::filled(64, 48, [40, 80, 120]);
//! let params = optimizer.optimize(&frame, 0.5).unwrap();
//! assert_eq!(params.bitrate, 1_000_000);
//! ```

mod cache;
mod edges;
mod error;
mod features;
mod model;
mod optimizer;
mod presets;
mod processor;

pub use cache::{CacheStats, FeatureCache};
pub use edges::{EdgeDetector, EdgeMap, EdgeThresholds};
pub use error::{AdvisorError, Result};
pub use features::{FeatureExtractor, FeatureVector, EDGE_DENSITY_SLOT, FEATURE_LEN, RESERVED_START};
pub use model::{LinearQualityModel, ModelInfo, ModelWeights, QualityPredictor};
pub use optimizer::{Candidate, CompressionParams, ParameterOptimizer, SearchGrid};
pub use presets::{EncoderSettings, QualityPreset, TargetResolution};
pub use processor::{ProcessorConfig, VideoProcessor};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Extract features from a frame with default thresholds.
pub fn analyze_frame(frame: &vidopt_core::RasterFrame) -> FeatureVector {
    FeatureExtractor::new().extract(frame)
}

/// Recommend parameters with the default extractor and placeholder model.
pub fn quick_optimize(
    frame: &vidopt_core::RasterFrame,
    target_quality: f64,
) -> Result<CompressionParams> {
    ParameterOptimizer::default().optimize(frame, target_quality)
}
