//! Compression parameter recommendation command.

use super::{Context, OutputMode};
use crate::image_io::load_frame;
use clap::Args;
use console::style;
use serde::Serialize;
use std::path::PathBuf;
use vidopt_advisor::{
    CompressionParams, EncoderSettings, QualityPreset, TargetResolution, VideoProcessor,
};

/// Output dimensions for a requested resolution target.
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionInfo {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

/// Recommendation for display.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    /// Image path.
    pub file: String,
    /// Requested quality target.
    pub target: f64,
    /// Recommended parameters.
    pub params: CompressionParams,
    /// Rate-control settings of the preset.
    pub encoder: EncoderSettings,
    /// Scaled output size, when a resolution target was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<ResolutionInfo>,
}

/// Recommend compression parameters for an image.
#[derive(Args, Debug)]
pub struct CmdOptimize {
    /// Path to the image file.
    pub image: PathBuf,

    /// Target quality in [0, 1].
    #[arg(short, long)]
    pub target: f64,

    /// Output resolution (original, 1080p, 720p, 480p).
    #[arg(short, long)]
    pub resolution: Option<TargetResolution>,

    /// Quality preset (low, medium, high, custom); overrides the config file.
    #[arg(short, long)]
    pub preset: Option<QualityPreset>,
}

impl CmdOptimize {
    /// Execute the optimize command.
    pub fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        let frame = load_frame(&self.image)?;

        let mut config = ctx.config.clone();
        if let Some(preset) = self.preset {
            config = config.with_preset(preset);
        }
        let preset = config.preset;

        let mut processor = VideoProcessor::with_config(config)?;
        let params = processor.optimize_parameters(&frame, self.target)?;

        let resolution = self.resolution.map(|r| {
            let (width, height) = r.output_dimensions(frame.cols() as u32, frame.rows() as u32);
            ResolutionInfo {
                name: r.to_string(),
                width,
                height,
            }
        });

        let recommendation = Recommendation {
            file: self.image.display().to_string(),
            target: self.target,
            params,
            encoder: preset.settings(),
            resolution,
        };

        match ctx.mode {
            OutputMode::Json => ctx.print_json(&recommendation)?,
            OutputMode::Quiet => println!("{}", recommendation.params),
            OutputMode::Normal | OutputMode::Verbose => {
                print_recommendation(&recommendation, preset, ctx.mode == OutputMode::Verbose)
            }
        }

        Ok(())
    }
}

fn print_recommendation(rec: &Recommendation, preset: QualityPreset, verbose: bool) {
    println!();
    println!("{}", style("Recommended Parameters").cyan().bold());
    println!();
    println!("  {:<18} {}", style("File:").white(), rec.file);
    println!("  {:<18} {:.3}", style("Target quality:").white(), rec.target);
    println!(
        "  {:<18} {}",
        style("Bitrate:").white(),
        style(format!("{} bps", rec.params.bitrate)).yellow()
    );
    println!(
        "  {:<18} {}x{}",
        style("Dimensions:").white(),
        rec.params.width,
        rec.params.height
    );
    println!(
        "  {:<18} {} ({})",
        style("Preset:").white(),
        rec.params.preset,
        preset
    );
    println!("  {:<18} {}", style("CRF:").white(), rec.encoder.crf);
    println!(
        "  {:<18} {:.4}",
        style("Predicted quality:").white(),
        rec.params.target_quality
    );

    if let Some(ref res) = rec.resolution {
        println!(
            "  {:<18} {}x{} ({})",
            style("Scaled output:").white(),
            res.width,
            res.height,
            res.name
        );
    }

    if verbose {
        println!();
        println!("  {}", style(&rec.params).dim());
    }
    println!();
}
