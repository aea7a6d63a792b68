//! Show quality presets command.

use super::{Context, OutputMode};
use clap::Args;
use console::style;
use serde::Serialize;
use vidopt_advisor::{QualityPreset, TargetResolution};

/// Preset information for display.
#[derive(Debug, Clone, Serialize)]
pub struct PresetInfo {
    /// Preset name.
    pub name: String,
    /// Constant rate factor.
    pub crf: u8,
    /// Encoder speed preset.
    pub speed: String,
}

impl From<QualityPreset> for PresetInfo {
    fn from(preset: QualityPreset) -> Self {
        let settings = preset.settings();
        Self {
            name: preset.to_string(),
            crf: settings.crf,
            speed: settings.preset,
        }
    }
}

/// Show quality presets and resolution targets.
#[derive(Args, Debug)]
pub struct CmdPresets {
    /// Show details for a specific preset.
    #[arg(long)]
    pub show: Option<String>,
}

impl CmdPresets {
    /// Execute the presets command.
    pub fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        let presets: Vec<PresetInfo> = QualityPreset::ALL.into_iter().map(PresetInfo::from).collect();

        if let Some(ref name) = self.show {
            let preset: QualityPreset = name.parse().map_err(|_| {
                anyhow::anyhow!(
                    "Unknown preset: {}. Run 'vidopt presets' to see available presets.",
                    name
                )
            })?;
            let info = PresetInfo::from(preset);
            match ctx.mode {
                OutputMode::Json => ctx.print_json(&info)?,
                OutputMode::Quiet => println!("{} {}", info.crf, info.speed),
                OutputMode::Normal | OutputMode::Verbose => print_preset_details(&info),
            }
            return Ok(());
        }

        let resolutions: Vec<&str> = TargetResolution::ALL.iter().map(|r| r.name()).collect();

        match ctx.mode {
            OutputMode::Json => {
                let output = serde_json::json!({
                    "presets": presets,
                    "resolutions": resolutions,
                });
                ctx.print_json(&output)?;
            }
            OutputMode::Quiet => {
                for preset in &presets {
                    println!("{}", preset.name);
                }
            }
            OutputMode::Normal | OutputMode::Verbose => {
                println!();
                println!("{}", style("Quality Presets").cyan().bold());
                println!();
                println!(
                    "{:<10} {:<6} {}",
                    style("NAME").white().bold(),
                    style("CRF").white().bold(),
                    style("SPEED").white().bold()
                );
                println!("{}", style("-".repeat(30)).dim());

                for preset in &presets {
                    println!(
                        "{:<10} {:<6} {}",
                        style(&preset.name).yellow(),
                        preset.crf,
                        preset.speed
                    );
                }

                println!();
                println!(
                    "{} {}",
                    style("Resolutions:").cyan().bold(),
                    resolutions.join(", ")
                );
                println!();
                println!(
                    "Use {} to see details for a specific preset.",
                    style("--show <preset>").cyan()
                );
            }
        }

        Ok(())
    }
}

fn print_preset_details(preset: &PresetInfo) {
    println!();
    println!(
        "{}: {}",
        style("Preset").cyan().bold(),
        style(&preset.name).yellow()
    );
    println!();
    println!("  {:<8} {}", style("CRF:").white(), preset.crf);
    println!("  {:<8} {}", style("Speed:").white(), preset.speed);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_info() {
        let info = PresetInfo::from(QualityPreset::Low);
        assert_eq!(info.name, "low");
        assert_eq!(info.crf, 28);
        assert_eq!(info.speed, "veryfast");
    }

    #[test]
    fn test_run_json() {
        let ctx = Context {
            mode: OutputMode::Json,
            config: Default::default(),
        };
        let cmd = CmdPresets { show: None };
        assert!(cmd.run(&ctx).is_ok());
    }

    #[test]
    fn test_unknown_preset() {
        let ctx = Context {
            mode: OutputMode::Quiet,
            config: Default::default(),
        };
        let cmd = CmdPresets {
            show: Some("ultra".to_string()),
        };
        assert!(cmd.run(&ctx).is_err());
    }
}
