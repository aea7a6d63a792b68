//! Pixel-domain frame quality metrics for vidopt.
//!
//! This crate provides the two full-reference metrics used by the advisor:
//!
//! - **PSNR** (Peak Signal-to-Noise Ratio) - Simple, fast pixel-based metric
//! - **SSIM** (Structural Similarity Index) - Gaussian-windowed perceptual metric
//!
//! # Example
//!
//! ```
//! use vidopt_core::RasterFrame;
//! use vidopt_quality::{psnr, ssim, QualityAssessment};
//!
//! let reference = RasterFrame::filled(32, 32, [128, 128, 128]);
//! let distorted = RasterFrame::filled(32, 32, [130, 128, 128]);
//!
//! let psnr_score = psnr(&reference, &distorted).unwrap();
//! let ssim_score = ssim(&reference, &distorted).unwrap();
//! assert!(psnr_score < 100.0);
//! assert!(ssim_score < 1.0);
//!
//! let report = QualityAssessment::default().assess(&reference, &distorted).unwrap();
//! println!("{}", report);
//! ```
//!
//! # Quality Metric Comparison
//!
//! | Metric | Range | Speed | Correlation with Human Perception |
//! |--------|-------|-------|----------------------------------|
//! | PSNR | unbounded dB, 100 for identical frames | Fast | Low |
//! | SSIM | -1 to 1 | Medium | Medium |

pub mod error;
pub mod gaussian;
pub mod psnr;
pub mod ssim;

pub use error::{QualityError, Result};
pub use gaussian::{gaussian_blur, GaussianKernel, Plane};
pub use psnr::{psnr, Psnr, PsnrConfig, PsnrResult};
pub use ssim::{ssim, Ssim, SsimConfig, SsimResult};

use serde::Serialize;
use vidopt_core::RasterFrame;

/// Quality metrics to compute.
#[derive(Debug, Clone, Copy)]
pub struct QualityMetrics {
    /// Compute PSNR.
    pub psnr: bool,
    /// Compute SSIM.
    pub ssim: bool,
}

impl Default for QualityMetrics {
    fn default() -> Self {
        Self {
            psnr: true,
            ssim: true,
        }
    }
}

impl QualityMetrics {
    /// PSNR only.
    pub fn psnr_only() -> Self {
        Self {
            psnr: true,
            ssim: false,
        }
    }

    /// SSIM only.
    pub fn ssim_only() -> Self {
        Self {
            psnr: false,
            ssim: true,
        }
    }
}

/// Configuration for quality assessment.
#[derive(Debug, Clone, Default)]
pub struct QualityConfig {
    /// Which metrics to compute.
    pub metrics: QualityMetrics,
    /// PSNR settings.
    pub psnr: PsnrConfig,
    /// SSIM settings.
    pub ssim: SsimConfig,
}

/// Quality assessment report for one frame pair.
#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    /// PSNR result (if computed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psnr: Option<PsnrResult>,
    /// SSIM result (if computed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssim: Option<SsimResult>,
}

impl QualityReport {
    /// Get quality rating string (based on SSIM, then identity).
    pub fn rating(&self) -> &'static str {
        if let Some(ref ssim) = self.ssim {
            return if ssim.ssim > 0.98 {
                "Excellent"
            } else if ssim.ssim >= 0.95 {
                "Good"
            } else if ssim.ssim >= 0.90 {
                "Fair"
            } else {
                "Poor"
            };
        }

        match self.psnr {
            Some(ref psnr) if psnr.identical => "Excellent",
            _ => "Unrated",
        }
    }
}

impl std::fmt::Display for QualityReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Quality Report")?;
        writeln!(f, "==============")?;

        if let Some(ref psnr) = self.psnr {
            writeln!(f, "PSNR: {:.2} dB", psnr.psnr)?;
        }

        if let Some(ref ssim) = self.ssim {
            writeln!(f, "SSIM: {:.4}", ssim.ssim)?;
        }

        writeln!(f)?;
        writeln!(f, "Rating: {}", self.rating())?;

        Ok(())
    }
}

/// Unified quality assessment calculator.
#[derive(Debug, Clone, Default)]
pub struct QualityAssessment {
    metrics: QualityMetrics,
    psnr_calc: Psnr,
    ssim_calc: Ssim,
}

impl QualityAssessment {
    /// Create a new quality assessment calculator.
    pub fn new(config: QualityConfig) -> Result<Self> {
        Ok(Self {
            metrics: config.metrics,
            psnr_calc: Psnr::new(config.psnr),
            ssim_calc: Ssim::new(config.ssim)?,
        })
    }

    /// Assess quality between reference and distorted frames.
    pub fn assess(&self, reference: &RasterFrame, distorted: &RasterFrame) -> Result<QualityReport> {
        let psnr = if self.metrics.psnr {
            Some(self.psnr_calc.calculate(reference, distorted)?)
        } else {
            None
        };

        let ssim = if self.metrics.ssim {
            Some(self.ssim_calc.calculate(reference, distorted)?)
        } else {
            None
        };

        Ok(QualityReport { psnr, ssim })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_frame(width: usize, height: usize, value: u8) -> RasterFrame {
        RasterFrame::filled(height, width, [value, value, value])
    }

    #[test]
    fn test_quality_assessment() {
        let reference = create_test_frame(64, 64, 128);
        let distorted = create_test_frame(64, 64, 138);

        let qa = QualityAssessment::default();
        let report = qa.assess(&reference, &distorted).unwrap();

        assert!(report.psnr.is_some());
        assert!(report.ssim.is_some());
    }

    #[test]
    fn test_mid_gray_self_comparison() {
        let frame = create_test_frame(100, 100, 128);
        let report = QualityAssessment::default().assess(&frame, &frame).unwrap();

        assert_eq!(report.psnr.unwrap().psnr, 100.0);
        assert!((report.ssim.unwrap().ssim - 1.0).abs() < 1e-9);
        assert_eq!(report.rating(), "Excellent");
    }

    #[test]
    fn test_metric_selection() {
        let frame = create_test_frame(16, 16, 1);
        let qa = QualityAssessment::new(QualityConfig {
            metrics: QualityMetrics::psnr_only(),
            ..Default::default()
        })
        .unwrap();
        let report = qa.assess(&frame, &frame).unwrap();
        assert!(report.psnr.is_some());
        assert!(report.ssim.is_none());
        assert_eq!(report.rating(), "Excellent");
    }

    #[test]
    fn test_quality_report_display() {
        let reference = create_test_frame(64, 64, 128);
        let report = QualityAssessment::default()
            .assess(&reference, &reference)
            .unwrap();

        let display = format!("{}", report);
        assert!(display.contains("PSNR"));
        assert!(display.contains("SSIM"));
        assert!(display.contains("Rating"));
    }
}
