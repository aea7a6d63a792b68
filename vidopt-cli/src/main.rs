//! vidopt CLI - Frame quality metrics and encoder parameter advice.

mod commands;
mod image_io;

use clap::{Parser, Subcommand};
use commands::{
    CmdAnalyze, CmdAssess, CmdOptimize, CmdPresets, CmdPsnr, CmdSsim, Context, OutputMode,
};
use console::style;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vidopt_advisor::ProcessorConfig;

/// Command-line arguments for the vidopt tool.
#[derive(Parser, Debug)]
#[command(name = "vidopt")]
#[command(version)]
#[command(about = "Frame quality metrics and compression parameter advisor")]
#[command(long_about = "vidopt measures the quality of still frames and recommends \n\
    encoder parameters from frame content.\n\n\
    EXAMPLES:\n    \
    vidopt analyze frame.png\n    \
    vidopt psnr reference.png distorted.png\n    \
    vidopt assess reference.png distorted.png --json\n    \
    vidopt optimize frame.png --target 0.9 --resolution 720p\n    \
    vidopt presets")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Processor configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output (debug logging and extra detail)
    #[arg(short, long, global = true, conflicts_with_all = ["quiet", "json"])]
    verbose: bool,

    /// Quiet mode (print only the result values)
    #[arg(short, long, global = true, conflicts_with_all = ["verbose", "json"])]
    quiet: bool,

    /// JSON output mode for programmatic parsing
    #[arg(long, global = true, conflicts_with_all = ["verbose", "quiet"])]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the feature vector of a frame
    Analyze(CmdAnalyze),
    /// Peak signal-to-noise ratio between two frames
    Psnr(CmdPsnr),
    /// Structural similarity between two frames
    Ssim(CmdSsim),
    /// Combined quality report for two frames
    Assess(CmdAssess),
    /// Recommend compression parameters for a frame
    Optimize(CmdOptimize),
    /// List quality presets and target resolutions
    Presets(CmdPresets),
}

impl Cli {
    /// Determine the output mode based on flags.
    fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else if self.verbose {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }

    fn processor_config(&self) -> anyhow::Result<ProcessorConfig> {
        match self.config {
            Some(ref path) => ProcessorConfig::from_file(path).map_err(|e| {
                anyhow::anyhow!("Failed to load config {}: {}", path.display(), e)
            }),
            None => Ok(ProcessorConfig::default()),
        }
    }
}

/// Install the log subscriber; JSON and quiet modes stay silent.
fn init_logging(mode: OutputMode) {
    if mode == OutputMode::Json || mode == OutputMode::Quiet {
        return;
    }

    let level = if mode == OutputMode::Verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr);

    let _ = match EnvFilter::try_from_default_env() {
        Ok(filter) => builder.with_env_filter(filter).try_init(),
        Err(_) => builder.with_max_level(level).try_init(),
    };
}

fn run(cli: &Cli, mode: OutputMode) -> anyhow::Result<()> {
    let ctx = Context {
        mode,
        config: cli.processor_config()?,
    };

    match cli.command {
        Command::Analyze(ref cmd) => cmd.run(&ctx),
        Command::Psnr(ref cmd) => cmd.run(&ctx),
        Command::Ssim(ref cmd) => cmd.run(&ctx),
        Command::Assess(ref cmd) => cmd.run(&ctx),
        Command::Optimize(ref cmd) => cmd.run(&ctx),
        Command::Presets(ref cmd) => cmd.run(&ctx),
    }
}

fn main() {
    let cli = Cli::parse();
    let mode = cli.output_mode();
    init_logging(mode);

    if let Err(e) = run(&cli, mode) {
        if mode == OutputMode::Json {
            let output = serde_json::json!({
                "type": "error",
                "message": format!("{:#}", e),
            });
            println!("{}", output);
        } else {
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
        }
        std::process::exit(1);
    }
}
