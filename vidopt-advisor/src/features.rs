//! Feature extraction from raster frames.
//!
//! A frame is reduced to a fixed 128-slot [`FeatureVector`]:
//!
//! | Slots | Content |
//! |-------|---------|
//! | 0-5 | mean, stddev per channel, on samples scaled to `[0, 1]` |
//! | 6 | edge density from the dual-threshold detector |
//! | 7-127 | reserved, always zero |

use crate::edges::{EdgeDetector, EdgeThresholds};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::Index;
use tracing::debug;
use vidopt_core::{RasterFrame, CHANNELS};

/// Number of slots in every feature vector.
pub const FEATURE_LEN: usize = 128;

/// Slot holding the edge density.
pub const EDGE_DENSITY_SLOT: usize = 2 * CHANNELS;

/// First reserved slot; it and every later slot stay zero.
pub const RESERVED_START: usize = EDGE_DENSITY_SLOT + 1;

/// Fixed-length frame summary fed to the quality predictor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_LEN]);

impl Default for FeatureVector {
    fn default() -> Self {
        Self([0.0; FEATURE_LEN])
    }
}

impl FeatureVector {
    /// Build a vector from the seven computed features; reserved slots are zero.
    pub fn from_parts(channel_stats: [(f64, f64); CHANNELS], edge_density: f64) -> Self {
        let mut values = [0.0; FEATURE_LEN];
        for (c, (mean, stddev)) in channel_stats.iter().enumerate() {
            values[2 * c] = *mean;
            values[2 * c + 1] = *stddev;
        }
        values[EDGE_DENSITY_SLOT] = edge_density;
        Self(values)
    }

    /// Wrap a raw array.
    pub fn from_array(values: [f64; FEATURE_LEN]) -> Self {
        Self(values)
    }

    /// All slots.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// All slots as a fixed-size array.
    pub fn as_array(&self) -> &[f64; FEATURE_LEN] {
        &self.0
    }

    /// Always [`FEATURE_LEN`].
    pub fn len(&self) -> usize {
        FEATURE_LEN
    }

    /// Always false.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Normalized mean of a channel.
    pub fn channel_mean(&self, channel: usize) -> f64 {
        self.0[2 * channel]
    }

    /// Normalized standard deviation of a channel.
    pub fn channel_stddev(&self, channel: usize) -> f64 {
        self.0[2 * channel + 1]
    }

    /// Fraction of edge pixels.
    pub fn edge_density(&self) -> f64 {
        self.0[EDGE_DENSITY_SLOT]
    }

    /// Reserved slots.
    pub fn reserved(&self) -> &[f64] {
        &self.0[RESERVED_START..]
    }

    /// Dot product with a weight array.
    pub fn dot(&self, weights: &[f64; FEATURE_LEN]) -> f64 {
        self.0.iter().zip(weights.iter()).map(|(x, w)| x * w).sum()
    }
}

impl Index<usize> for FeatureVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

impl<'de> Deserialize<'de> for FeatureVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<f64>::deserialize(deserializer)?;
        let len = values.len();
        let array: [f64; FEATURE_LEN] = values.try_into().map_err(|_| {
            D::Error::custom(format!("expected {} features, got {}", FEATURE_LEN, len))
        })?;
        Ok(Self(array))
    }
}

/// Feature extractor for raster frames.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    edges: EdgeDetector,
}

impl FeatureExtractor {
    /// Create a new feature extractor with default edge thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with custom edge thresholds.
    pub fn with_thresholds(thresholds: EdgeThresholds) -> Self {
        Self {
            edges: EdgeDetector::new(thresholds),
        }
    }

    /// Edge detector in use.
    pub fn edge_detector(&self) -> &EdgeDetector {
        &self.edges
    }

    /// Extract the feature vector of a frame.
    pub fn extract(&self, frame: &RasterFrame) -> FeatureVector {
        let stats = channel_stats(frame);
        let edge_density = self.edges.detect(frame).density();

        debug!(
            "Extracted features for {}: stats={:?}, edge_density={:.4}",
            frame.shape(),
            stats,
            edge_density
        );

        FeatureVector::from_parts(stats, edge_density)
    }
}

/// Per-channel mean and population standard deviation of samples scaled to `[0, 1]`.
fn channel_stats(frame: &RasterFrame) -> [(f64, f64); CHANNELS] {
    let mut stats = [(0.0, 0.0); CHANNELS];
    let n = frame.shape().pixel_count();
    if n == 0 {
        return stats;
    }

    for (c, slot) in stats.iter_mut().enumerate() {
        let (sum, sum_sq) = frame.channel(c).fold((0.0f64, 0.0f64), |(s, sq), v| {
            let x = v as f64 / 255.0;
            (s + x, sq + x * x)
        });
        let mean = sum / n as f64;
        let variance = (sum_sq / n as f64 - mean * mean).max(0.0);
        *slot = (mean.clamp(0.0, 1.0), variance.sqrt().clamp(0.0, 1.0));
    }

    stats
}
