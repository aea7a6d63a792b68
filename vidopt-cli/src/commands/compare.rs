//! Full-reference quality commands.

use super::{Context, OutputMode};
use crate::image_io::load_pair;
use clap::Args;
use console::style;
use std::path::PathBuf;
use vidopt_quality::{
    Psnr, QualityAssessment, QualityConfig, QualityMetrics, QualityReport, Ssim,
};

/// Reference/distorted image pair.
#[derive(Args, Debug)]
pub struct FramePair {
    /// Reference image.
    pub reference: PathBuf,
    /// Distorted image.
    pub distorted: PathBuf,
}

/// Peak signal-to-noise ratio between two images.
#[derive(Args, Debug)]
pub struct CmdPsnr {
    #[command(flatten)]
    pub pair: FramePair,
}

impl CmdPsnr {
    /// Execute the psnr command.
    pub fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        let (reference, distorted) = load_pair(&self.pair.reference, &self.pair.distorted)?;
        let result = Psnr::new(ctx.config.psnr.clone()).calculate(&reference, &distorted)?;

        match ctx.mode {
            OutputMode::Json => ctx.print_json(&result)?,
            OutputMode::Quiet => println!("{}", result.psnr),
            OutputMode::Normal | OutputMode::Verbose => {
                let label = if result.identical {
                    style("(identical)").green().to_string()
                } else {
                    String::new()
                };
                println!(
                    "{} {} {}",
                    style("PSNR:").cyan().bold(),
                    style(format!("{:.4} dB", result.psnr)).yellow(),
                    label
                );
                if ctx.mode == OutputMode::Verbose {
                    println!("{} {:.6}", style("MSE:").white(), result.mse);
                }
            }
        }

        Ok(())
    }
}

/// Structural similarity between two images.
#[derive(Args, Debug)]
pub struct CmdSsim {
    #[command(flatten)]
    pub pair: FramePair,
}

impl CmdSsim {
    /// Execute the ssim command.
    pub fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        let (reference, distorted) = load_pair(&self.pair.reference, &self.pair.distorted)?;
        let result = Ssim::new(ctx.config.ssim.clone())?.calculate(&reference, &distorted)?;

        match ctx.mode {
            OutputMode::Json => ctx.print_json(&result)?,
            OutputMode::Quiet => println!("{}", result.ssim),
            OutputMode::Normal | OutputMode::Verbose => {
                println!(
                    "{} {}",
                    style("SSIM:").cyan().bold(),
                    style(format!("{:.6}", result.ssim)).yellow()
                );
                if ctx.mode == OutputMode::Verbose {
                    for (c, value) in result.per_channel.iter().enumerate() {
                        println!("  channel {}: {:.6}", c, value);
                    }
                }
            }
        }

        Ok(())
    }
}

/// Combined quality report for two images.
#[derive(Args, Debug)]
pub struct CmdAssess {
    #[command(flatten)]
    pub pair: FramePair,

    /// Skip SSIM.
    #[arg(long, conflicts_with = "no_psnr")]
    pub no_ssim: bool,

    /// Skip PSNR.
    #[arg(long)]
    pub no_psnr: bool,
}

impl CmdAssess {
    fn metrics(&self) -> QualityMetrics {
        if self.no_psnr {
            QualityMetrics::ssim_only()
        } else if self.no_ssim {
            QualityMetrics::psnr_only()
        } else {
            QualityMetrics::default()
        }
    }

    /// Execute the assess command.
    pub fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        let (reference, distorted) = load_pair(&self.pair.reference, &self.pair.distorted)?;
        let assessment = QualityAssessment::new(QualityConfig {
            metrics: self.metrics(),
            psnr: ctx.config.psnr.clone(),
            ssim: ctx.config.ssim.clone(),
        })?;
        let report = assessment.assess(&reference, &distorted)?;

        match ctx.mode {
            OutputMode::Json => {
                let output = serde_json::json!({
                    "report": report,
                    "rating": report.rating(),
                });
                ctx.print_json(&output)?;
            }
            OutputMode::Quiet => println!("{}", report.rating()),
            OutputMode::Normal | OutputMode::Verbose => print_report(&report),
        }

        Ok(())
    }
}

fn print_report(report: &QualityReport) {
    println!();
    for line in report.to_string().lines() {
        if line.starts_with("Rating:") {
            println!("{} {}", style("Rating:").cyan().bold(), style(report.rating()).green());
        } else {
            println!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assess(no_psnr: bool, no_ssim: bool) -> CmdAssess {
        CmdAssess {
            pair: FramePair {
                reference: PathBuf::from("a.png"),
                distorted: PathBuf::from("b.png"),
            },
            no_ssim,
            no_psnr,
        }
    }

    #[test]
    fn test_metric_flags() {
        let both = assess(false, false).metrics();
        assert!(both.psnr && both.ssim);

        let ssim = assess(true, false).metrics();
        assert!(!ssim.psnr && ssim.ssim);

        let psnr = assess(false, true).metrics();
        assert!(psnr.psnr && !psnr.ssim);
    }
}
