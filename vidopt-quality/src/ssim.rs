//! Structural Similarity Index (SSIM) metric.
//!
//! Local statistics come from a dense Gaussian-filtered map (11x11 window,
//! sigma 1.5 by default): every pixel of every channel contributes one SSIM
//! value, and the score is the mean of that map.
//!
//! SSIM values range from -1 to 1, where 1 indicates perfect similarity.
//! Typical interpretation:
//! - > 0.98: Nearly indistinguishable
//! - 0.95-0.98: High quality
//! - 0.90-0.95: Good quality
//! - < 0.90: Noticeable artifacts

use crate::error::{validate_pair, QualityError, Result};
use crate::gaussian::{gaussian_blur, GaussianKernel, Plane};
use serde::{Deserialize, Serialize};
use tracing::debug;
use vidopt_core::{RasterFrame, CHANNELS};

/// SSIM result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SsimResult {
    /// Mean of the SSIM map over all pixels and channels.
    pub ssim: f64,
    /// Per-channel map means.
    pub per_channel: [f64; 3],
}

impl SsimResult {
    /// Check if quality is excellent (> 0.98).
    pub fn is_excellent(&self) -> bool {
        self.ssim > 0.98
    }
}

/// SSIM calculator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SsimConfig {
    /// Gaussian window size (odd, default: 11).
    pub window_size: usize,
    /// Gaussian sigma (default: 1.5).
    pub sigma: f64,
    /// K1 stability constant (default: 0.01).
    pub k1: f64,
    /// K2 stability constant (default: 0.03).
    pub k2: f64,
    /// Dynamic range of the samples (default: 255).
    pub max_value: f64,
}

impl Default for SsimConfig {
    fn default() -> Self {
        Self {
            window_size: 11,
            sigma: 1.5,
            k1: 0.01,
            k2: 0.03,
            max_value: 255.0,
        }
    }
}

impl SsimConfig {
    /// Create config with custom window size.
    pub fn with_window_size(mut self, size: usize) -> Self {
        self.window_size = size;
        self
    }

    /// Luminance stabilizer, `(k1 * L)^2` (6.5025 for 8-bit).
    pub fn c1(&self) -> f64 {
        (self.k1 * self.max_value).powi(2)
    }

    /// Contrast stabilizer, `(k2 * L)^2` (58.5225 for 8-bit).
    pub fn c2(&self) -> f64 {
        (self.k2 * self.max_value).powi(2)
    }

    /// Check the window parameters.
    pub fn validate(&self) -> Result<()> {
        if self.window_size < 3 {
            return Err(QualityError::InvalidParameter(format!(
                "SSIM window must be at least 3, got {}",
                self.window_size
            )));
        }
        GaussianKernel::new(self.window_size, self.sigma).map(|_| ())
    }
}

/// SSIM calculator.
#[derive(Debug, Clone)]
pub struct Ssim {
    config: SsimConfig,
    /// Precomputed separable Gaussian window.
    kernel: GaussianKernel,
}

impl Default for Ssim {
    fn default() -> Self {
        let config = SsimConfig::default();
        let kernel = GaussianKernel::build(config.window_size, config.sigma);
        Self { config, kernel }
    }
}

impl Ssim {
    /// Create a new SSIM calculator.
    pub fn new(config: SsimConfig) -> Result<Self> {
        config.validate()?;
        let kernel = GaussianKernel::new(config.window_size, config.sigma)?;
        Ok(Self { config, kernel })
    }

    /// Get the configuration.
    pub fn config(&self) -> &SsimConfig {
        &self.config
    }

    /// Calculate SSIM between reference and distorted frames.
    pub fn calculate(&self, reference: &RasterFrame, distorted: &RasterFrame) -> Result<SsimResult> {
        validate_pair(reference, distorted)?;

        let mut per_channel = [0.0f64; 3];
        for (c, score) in per_channel.iter_mut().enumerate().take(CHANNELS) {
            let img1 = Plane::from_channel(reference, c);
            let img2 = Plane::from_channel(distorted, c);
            *score = self.ssim_map(&img1, &img2).mean();
        }

        // Every channel map has the same pixel count, so the mean of the
        // channel means equals the mean over the whole map.
        let ssim = per_channel.iter().sum::<f64>() / CHANNELS as f64;

        debug!(
            "SSIM over {}: {:.6} (per channel {:?})",
            reference.shape(),
            ssim,
            per_channel
        );

        Ok(SsimResult { ssim, per_channel })
    }

    /// Compute the dense SSIM map for one pair of planes.
    pub fn ssim_map(&self, img1: &Plane, img2: &Plane) -> Plane {
        let c1 = self.config.c1();
        let c2 = self.config.c2();

        let mu1 = gaussian_blur(img1, &self.kernel);
        let mu2 = gaussian_blur(img2, &self.kernel);

        let img1_sq = gaussian_blur(&img1.square(), &self.kernel);
        let img2_sq = gaussian_blur(&img2.square(), &self.kernel);
        let img12 = gaussian_blur(&img1.mul(img2), &self.kernel);

        let data = (0..mu1.data.len())
            .map(|i| {
                let m1 = mu1.data[i];
                let m2 = mu2.data[i];
                let mu1_sq = m1 * m1;
                let mu2_sq = m2 * m2;
                let mu1_mu2 = m1 * m2;

                let sigma1_sq = img1_sq.data[i] - mu1_sq;
                let sigma2_sq = img2_sq.data[i] - mu2_sq;
                let sigma12 = img12.data[i] - mu1_mu2;

                ((2.0 * mu1_mu2 + c1) * (2.0 * sigma12 + c2))
                    / ((mu1_sq + mu2_sq + c1) * (sigma1_sq + sigma2_sq + c2))
            })
            .collect();

        Plane {
            width: img1.width,
            height: img1.height,
            data,
        }
    }
}

/// Calculate SSIM with default settings.
pub fn ssim(reference: &RasterFrame, distorted: &RasterFrame) -> Result<f64> {
    let calc = Ssim::default();
    Ok(calc.calculate(reference, distorted)?.ssim)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_frame(width: usize, height: usize, value: u8) -> RasterFrame {
        RasterFrame::filled(height, width, [value, value, value])
    }

    fn checkerboard(size: usize, cell: usize) -> RasterFrame {
        RasterFrame::from_fn(size, size, |r, c| {
            if (r / cell + c / cell) % 2 == 0 {
                [220, 200, 180]
            } else {
                [30, 40, 50]
            }
        })
    }

    #[test]
    fn test_constants() {
        let config = SsimConfig::default();
        assert!((config.c1() - 6.5025).abs() < 1e-9);
        assert!((config.c2() - 58.5225).abs() < 1e-9);
    }

    #[test]
    fn test_identical_frames_ssim() {
        let frame = create_test_frame(64, 64, 128);
        let result = ssim(&frame, &frame).unwrap();
        assert!((result - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_identical_textured_frames_ssim() {
        let frame = checkerboard(48, 5);
        let result = Ssim::default().calculate(&frame, &frame).unwrap();
        assert!((result.ssim - 1.0).abs() < 1e-9);
        assert!(result.is_excellent());
        for c in result.per_channel {
            assert!((c - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_different_frames_ssim() {
        let ref_frame = create_test_frame(64, 64, 128);
        let dist_frame = create_test_frame(64, 64, 138);
        let result = ssim(&ref_frame, &dist_frame).unwrap();
        assert!(result < 1.0 && result > 0.0);
    }

    #[test]
    fn test_constant_offset_closed_form() {
        // Flat frames have zero variance, so SSIM reduces to the luminance term.
        let config = SsimConfig::default();
        let c1 = config.c1();
        let expected = (2.0 * 128.0 * 138.0 + c1) / (128.0 * 128.0 + 138.0 * 138.0 + c1);
        assert!((expected - 0.997_177_891_80).abs() < 1e-10);

        let result = Ssim::default()
            .calculate(&create_test_frame(64, 64, 128), &create_test_frame(64, 64, 138))
            .unwrap();
        assert!((result.ssim - expected).abs() < 1e-9);
        for c in result.per_channel {
            assert!((c - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_textured_window_matches_direct_sum() {
        // 13x13 puts the 11x11 window centred on (6, 6) fully inside the frame.
        let size = 13;
        let center = 6;
        let a = RasterFrame::from_fn(size, size, |r, c| {
            let v = ((r * 37 + c * 11 + r * c * 5) % 256) as u8;
            [v, v, v]
        });
        let b = RasterFrame::from_fn(size, size, |r, c| {
            let v = ((r * 13 + c * 29 + (r ^ c) * 7) % 256) as u8;
            [v, v, v]
        });
        let x = Plane::from_channel(&a, 0);
        let y = Plane::from_channel(&b, 0);

        let config = SsimConfig::default();
        let kernel = GaussianKernel::new(config.window_size, config.sigma).unwrap();
        let w = kernel.weights();
        let half = w.len() / 2;

        let (mut mx, mut my, mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0, 0.0, 0.0);
        for (i, wi) in w.iter().enumerate() {
            for (j, wj) in w.iter().enumerate() {
                let idx = (center + i - half) * size + (center + j - half);
                let weight = wi * wj;
                let (xv, yv) = (x.data[idx], y.data[idx]);
                mx += weight * xv;
                my += weight * yv;
                sxx += weight * xv * xv;
                syy += weight * yv * yv;
                sxy += weight * xv * yv;
            }
        }
        let (vx, vy, cxy) = (sxx - mx * mx, syy - my * my, sxy - mx * my);
        let (c1, c2) = (config.c1(), config.c2());
        let expected = ((2.0 * mx * my + c1) * (2.0 * cxy + c2))
            / ((mx * mx + my * my + c1) * (vx + vy + c2));

        let map = Ssim::default().ssim_map(&x, &y);
        let actual = map.data[center * size + center];
        assert!((actual - expected).abs() < 1e-9, "{} vs {}", actual, expected);
        assert!(expected < 0.9);
    }

    #[test]
    fn test_inverted_texture_scores_low() {
        let a = checkerboard(48, 4);
        let b = RasterFrame::from_fn(48, 48, |r, c| {
            let p = a.pixel(r, c);
            [255 - p[0], 255 - p[1], 255 - p[2]]
        });
        let result = ssim(&a, &b).unwrap();
        assert!(result < 0.5);
    }

    #[test]
    fn test_small_frames_supported() {
        // Smaller than the window: reflect-101 borders keep the map dense.
        let frame = RasterFrame::from_fn(3, 5, |r, c| [(r * 40) as u8, (c * 30) as u8, 9]);
        let result = ssim(&frame, &frame).unwrap();
        assert!((result - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_window() {
        assert!(Ssim::new(SsimConfig::default().with_window_size(8)).is_err());
        assert!(Ssim::new(SsimConfig::default().with_window_size(1)).is_err());
        assert!(Ssim::new(SsimConfig::default().with_window_size(7)).is_ok());
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = create_test_frame(16, 16, 0);
        let b = create_test_frame(16, 17, 0);
        assert!(matches!(
            ssim(&a, &b),
            Err(QualityError::DimensionMismatch { .. })
        ));
    }
}
