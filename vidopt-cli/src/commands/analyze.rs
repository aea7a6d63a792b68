//! Frame feature extraction command.

use super::{Context, OutputMode};
use crate::image_io::load_frame;
use clap::Args;
use console::style;
use serde::Serialize;
use std::path::PathBuf;
use vidopt_advisor::{FeatureVector, VideoProcessor};

const CHANNEL_NAMES: [&str; 3] = ["Channel 0", "Channel 1", "Channel 2"];

/// Feature summary for display.
#[derive(Debug, Clone, Serialize)]
pub struct FrameAnalysis {
    /// Image path.
    pub file: String,
    /// Frame width in pixels.
    pub width: usize,
    /// Frame height in pixels.
    pub height: usize,
    /// Content digest (hex).
    pub digest: String,
    /// Normalized mean per channel.
    pub channel_means: [f64; 3],
    /// Normalized standard deviation per channel.
    pub channel_stddevs: [f64; 3],
    /// Fraction of edge pixels.
    pub edge_density: f64,
    /// Full 128-slot feature vector.
    pub features: FeatureVector,
}

/// Extract the feature vector of an image.
#[derive(Args, Debug)]
pub struct CmdAnalyze {
    /// Path to the image file.
    pub image: PathBuf,
}

impl CmdAnalyze {
    /// Execute the analyze command.
    pub fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        let frame = load_frame(&self.image)?;
        let mut processor = VideoProcessor::with_config(ctx.config.clone())?;
        let features = processor.analyze_frame(&frame);

        let analysis = FrameAnalysis {
            file: self.image.display().to_string(),
            width: frame.cols(),
            height: frame.rows(),
            digest: frame.digest().to_hex(),
            channel_means: [0, 1, 2].map(|c| features.channel_mean(c)),
            channel_stddevs: [0, 1, 2].map(|c| features.channel_stddev(c)),
            edge_density: features.edge_density(),
            features,
        };

        match ctx.mode {
            OutputMode::Json => ctx.print_json(&analysis)?,
            OutputMode::Quiet => {
                let values: Vec<String> = features.as_slice()[..7]
                    .iter()
                    .map(|v| format!("{:.6}", v))
                    .collect();
                println!("{}", values.join(" "));
            }
            OutputMode::Normal | OutputMode::Verbose => {
                print_analysis(&analysis, ctx.mode == OutputMode::Verbose)
            }
        }

        Ok(())
    }
}

fn print_analysis(analysis: &FrameAnalysis, verbose: bool) {
    println!();
    println!("{}", style("Frame Analysis").cyan().bold());
    println!();
    println!("  {:<14} {}", style("File:").white(), analysis.file);
    println!(
        "  {:<14} {}x{}",
        style("Size:").white(),
        analysis.width,
        analysis.height
    );
    if verbose {
        println!("  {:<14} {}", style("Digest:").white(), analysis.digest);
    }
    println!();

    println!(
        "  {:<12} {:>10} {:>10}",
        style("CHANNEL").white().bold(),
        style("MEAN").white().bold(),
        style("STDDEV").white().bold()
    );
    println!("  {}", style("-".repeat(34)).dim());
    for (c, name) in CHANNEL_NAMES.iter().enumerate() {
        println!(
            "  {:<12} {:>10.4} {:>10.4}",
            style(name).yellow(),
            analysis.channel_means[c],
            analysis.channel_stddevs[c]
        );
    }
    println!();
    println!(
        "  {:<14} {}",
        style("Edge density:").white(),
        style(format!("{:.4}", analysis.edge_density)).green()
    );
    println!();
}
