//! Encoder quality presets and target resolutions.

use crate::error::AdvisorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Encoder rate-control settings for a preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderSettings {
    /// Constant rate factor.
    pub crf: u8,
    /// Encoder speed preset name.
    pub preset: String,
}

/// Named quality level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
    Custom,
}

impl QualityPreset {
    /// All presets, lowest quality first.
    pub const ALL: [QualityPreset; 4] = [Self::Low, Self::Medium, Self::High, Self::Custom];

    /// Encoder settings for this preset.
    ///
    /// `Custom` carries no settings of its own and falls back to the medium values.
    pub fn settings(&self) -> EncoderSettings {
        let (crf, preset) = match self {
            Self::Low => (28, "veryfast"),
            Self::Medium | Self::Custom => (23, "medium"),
            Self::High => (18, "slow"),
        };
        EncoderSettings {
            crf,
            preset: preset.to_string(),
        }
    }

    /// Lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QualityPreset {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "custom" => Ok(Self::Custom),
            other => Err(AdvisorError::InvalidParameter(format!(
                "Unknown quality preset: {}",
                other
            ))),
        }
    }
}

/// Output resolution target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TargetResolution {
    #[default]
    #[serde(rename = "original")]
    Original,
    #[serde(rename = "1080p")]
    P1080,
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "480p")]
    P480,
}

impl TargetResolution {
    /// All targets, largest first.
    pub const ALL: [TargetResolution; 4] = [Self::Original, Self::P1080, Self::P720, Self::P480];

    /// Target height, or `None` to keep the source size.
    pub fn height(&self) -> Option<u32> {
        match self {
            Self::Original => None,
            Self::P1080 => Some(1080),
            Self::P720 => Some(720),
            Self::P480 => Some(480),
        }
    }

    /// Output dimensions for a source of `width` x `height`, preserving aspect ratio.
    ///
    /// The width is truncated, not rounded. A zero-height source is returned unchanged.
    pub fn output_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        match self.height() {
            Some(target) if height > 0 => {
                let aspect = width as f64 / height as f64;
                ((target as f64 * aspect) as u32, target)
            }
            _ => (width, height),
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::P1080 => "1080p",
            Self::P720 => "720p",
            Self::P480 => "480p",
        }
    }
}

impl fmt::Display for TargetResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TargetResolution {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "original" => Ok(Self::Original),
            "1080p" | "1080" => Ok(Self::P1080),
            "720p" | "720" => Ok(Self::P720),
            "480p" | "480" => Ok(Self::P480),
            other => Err(AdvisorError::InvalidParameter(format!(
                "Unknown target resolution: {}",
                other
            ))),
        }
    }
}
