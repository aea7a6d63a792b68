//! Peak Signal-to-Noise Ratio (PSNR) metric.
//!
//! The error term is the sum of squared sample differences over every
//! channel divided by the pixel count (not the sample count), and the ratio
//! is taken against a unit peak: `20 * log10(1 / sqrt(mse))`. Raw 8-bit
//! differences are fed in without rescaling, so the values sit far below
//! the textbook 8-bit PSNR scale. Downstream consumers rely on this scale.
//!
//! Frames whose error does not exceed the identity threshold report the
//! sentinel value (100 dB by default).

use crate::error::{validate_pair, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vidopt_core::RasterFrame;

/// PSNR result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PsnrResult {
    /// PSNR (dB), or the sentinel for identical frames.
    pub psnr: f64,
    /// Sum of squared differences divided by the pixel count.
    pub mse: f64,
    /// Frames were considered identical.
    pub identical: bool,
}

/// PSNR calculator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PsnrConfig {
    /// Error at or below which frames count as identical.
    pub identical_threshold: f64,
    /// Value reported for identical frames.
    pub identical_sentinel: f64,
}

impl Default for PsnrConfig {
    fn default() -> Self {
        Self {
            identical_threshold: 1e-10,
            identical_sentinel: 100.0,
        }
    }
}

/// PSNR calculator.
#[derive(Debug, Clone, Default)]
pub struct Psnr {
    config: PsnrConfig,
}

impl Psnr {
    /// Create a new PSNR calculator.
    pub fn new(config: PsnrConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &PsnrConfig {
        &self.config
    }

    /// Calculate PSNR between reference and distorted frames.
    pub fn calculate(&self, reference: &RasterFrame, distorted: &RasterFrame) -> Result<PsnrResult> {
        validate_pair(reference, distorted)?;

        let pixels = reference.shape().pixel_count();
        let squared_error: f64 = reference
            .data()
            .par_iter()
            .zip(distorted.data().par_iter())
            .map(|(&a, &b)| {
                let diff = a.abs_diff(b) as f64;
                diff * diff
            })
            .sum();

        let mse = if pixels == 0 {
            0.0
        } else {
            squared_error / pixels as f64
        };

        let result = if mse <= self.config.identical_threshold {
            PsnrResult {
                psnr: self.config.identical_sentinel,
                mse,
                identical: true,
            }
        } else {
            PsnrResult {
                psnr: 20.0 * (1.0 / mse.sqrt()).log10(),
                mse,
                identical: false,
            }
        };

        debug!(
            "PSNR over {}: mse={:.4}, psnr={:.4}",
            reference.shape(),
            result.mse,
            result.psnr
        );

        Ok(result)
    }
}

/// Calculate PSNR with default settings.
pub fn psnr(reference: &RasterFrame, distorted: &RasterFrame) -> Result<f64> {
    let calc = Psnr::default();
    Ok(calc.calculate(reference, distorted)?.psnr)
}
