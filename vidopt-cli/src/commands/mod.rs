//! CLI subcommand implementations.

pub mod analyze;
pub mod compare;
pub mod optimize;
pub mod presets;

pub use analyze::CmdAnalyze;
pub use compare::{CmdAssess, CmdPsnr, CmdSsim};
pub use optimize::CmdOptimize;
pub use presets::CmdPresets;

use serde::Serialize;
use vidopt_advisor::ProcessorConfig;

/// Output mode for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Normal human-readable output.
    Normal,
    /// JSON output for programmatic parsing.
    Json,
    /// Quiet mode with bare values.
    Quiet,
    /// Verbose mode with extra detail.
    Verbose,
}

/// Settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct Context {
    pub mode: OutputMode,
    pub config: ProcessorConfig,
}

impl Context {
    /// Print a value as pretty JSON.
    pub fn print_json<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}
