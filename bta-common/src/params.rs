//! Shot detection parameters
//!
//! Defaults reproduce the tuned ladders of the field tool. Every field can be
//! overridden from the `[analysis]` table of the batch configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Recording analysis parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParameters {
    /// Accelerometer threshold ladder (raw LSB magnitude)
    #[serde(default)]
    pub shot: ShotThresholds,

    /// High-g threshold ladder (physical units)
    #[serde(default)]
    pub hig: HiGThresholds,

    /// Samples skipped past the primary shot before the alternate scan (default: 30)
    #[serde(default = "default_shot_separation")]
    pub shot_separation: usize,
}

/// Accelerometer ladder, raw magnitude (inclusive bounds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotThresholds {
    /// Very high confidence (default: 40000)
    #[serde(default = "default_shot_very_high")]
    pub very_high: f64,

    /// High confidence (default: 35000)
    #[serde(default = "default_shot_high")]
    pub high: f64,

    /// Medium confidence (default: 30000)
    #[serde(default = "default_shot_medium")]
    pub medium: f64,

    /// Low confidence (default: 22000)
    #[serde(default = "default_shot_low")]
    pub low: f64,

    /// Either sample of a consecutive pair must reach this (default: 17000)
    #[serde(default = "default_pair_strong")]
    pub pair_strong: f64,

    /// Sum a consecutive pair must reach (default: 29000)
    #[serde(default = "default_pair_sum")]
    pub pair_sum: f64,
}

/// High-g ladder, unit magnitude (exclusive bounds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HiGThresholds {
    #[serde(default = "default_hig_very_high")]
    pub very_high: f64,

    #[serde(default = "default_hig_high")]
    pub high: f64,

    #[serde(default = "default_hig_medium")]
    pub medium: f64,

    #[serde(default = "default_hig_low")]
    pub low: f64,

    #[serde(default = "default_hig_very_low")]
    pub very_low: f64,
}

// Default value functions
fn default_shot_separation() -> usize {
    30
}

fn default_shot_very_high() -> f64 {
    40000.0
}

fn default_shot_high() -> f64 {
    35000.0
}

fn default_shot_medium() -> f64 {
    30000.0
}

fn default_shot_low() -> f64 {
    22000.0
}

fn default_pair_strong() -> f64 {
    17000.0
}

fn default_pair_sum() -> f64 {
    29000.0
}

fn default_hig_very_high() -> f64 {
    50.0
}

fn default_hig_high() -> f64 {
    40.0
}

fn default_hig_medium() -> f64 {
    30.0
}

fn default_hig_low() -> f64 {
    20.0
}

fn default_hig_very_low() -> f64 {
    10.0
}

impl Default for AnalysisParameters {
    fn default() -> Self {
        Self {
            shot: ShotThresholds::default(),
            hig: HiGThresholds::default(),
            shot_separation: default_shot_separation(),
        }
    }
}

impl Default for ShotThresholds {
    fn default() -> Self {
        Self {
            very_high: default_shot_very_high(),
            high: default_shot_high(),
            medium: default_shot_medium(),
            low: default_shot_low(),
            pair_strong: default_pair_strong(),
            pair_sum: default_pair_sum(),
        }
    }
}

impl Default for HiGThresholds {
    fn default() -> Self {
        Self {
            very_high: default_hig_very_high(),
            high: default_hig_high(),
            medium: default_hig_medium(),
            low: default_hig_low(),
            very_low: default_hig_very_low(),
        }
    }
}

/// Ladders must run strictly downward
fn check_descending(name: &str, ladder: &[f64]) -> Result<()> {
    if ladder.iter().any(|v| !v.is_finite()) {
        return Err(Error::Config(format!("{} thresholds must be finite", name)));
    }
    if ladder.windows(2).any(|pair| pair[0] <= pair[1]) {
        return Err(Error::Config(format!(
            "{} thresholds must be strictly descending: {:?}",
            name, ladder
        )));
    }
    Ok(())
}

impl ShotThresholds {
    pub fn validate(&self) -> Result<()> {
        check_descending("shot", &[self.very_high, self.high, self.medium, self.low])?;
        if self.pair_strong <= 0.0 || self.pair_sum <= 0.0 {
            return Err(Error::Config(
                "shot pair thresholds must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl HiGThresholds {
    pub fn validate(&self) -> Result<()> {
        check_descending(
            "hig",
            &[self.very_high, self.high, self.medium, self.low, self.very_low],
        )
    }
}

impl AnalysisParameters {
    pub fn validate(&self) -> Result<()> {
        self.shot.validate()?;
        self.hig.validate()
    }
}
