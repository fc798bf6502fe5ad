//! Classification thresholds.
//!
//! Defaults are tuned for the Israeli Mediterranean coast. A deployment can
//! retune them with a config file (any format the `config` crate reads) and
//! `MARINE__...` environment variables, e.g.
//! `MARINE__WAVE_HEIGHT__OPTIMAL__MIN=1.0`.

use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::utils::constants::ENV_PREFIX;

/// Closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct Band {
    #[validate(range(min = 0.0))]
    pub min: f64,

    #[validate(range(min = 0.0))]
    pub max: f64,
}

impl Band {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Inclusive at both ends; absent values never qualify.
    pub fn contains(&self, value: Option<f64>) -> bool {
        value.is_some_and(|v| v >= self.min && v <= self.max)
    }

    pub fn encloses(&self, other: &Band) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    fn check(&self, name: &str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(ProcessingError::Config(format!(
                "{} band [{}, {}] is not a valid interval",
                name, self.min, self.max
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct WaveHeightThresholds {
    #[validate(nested)]
    pub optimal: Band,

    #[validate(nested)]
    pub acceptable: Band,
}

impl Default for WaveHeightThresholds {
    fn default() -> Self {
        Self {
            optimal: Band::new(1.2, 3.2),
            acceptable: Band::new(0.6, 4.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SwellHeightThresholds {
    #[validate(range(min = 0.0))]
    pub acceptable_min: f64,
}

impl Default for SwellHeightThresholds {
    fn default() -> Self {
        Self { acceptable_min: 0.5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SwellPeriodThresholds {
    #[validate(nested)]
    pub optimal: Band,

    #[validate(range(min = 0.0))]
    pub acceptable_min: f64,
}

impl Default for SwellPeriodThresholds {
    fn default() -> Self {
        Self {
            optimal: Band::new(8.0, 15.0),
            acceptable_min: 5.5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ThresholdConfig {
    #[validate(nested)]
    pub wave_height: WaveHeightThresholds,

    #[validate(nested)]
    pub swell_height: SwellHeightThresholds,

    #[validate(nested)]
    pub swell_period: SwellPeriodThresholds,
}

impl ThresholdConfig {
    /// Load thresholds: defaults, then `path` if given, then environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let thresholds: ThresholdConfig = builder.build()?.try_deserialize()?;
        thresholds.check()?;
        Ok(thresholds)
    }

    /// Range checks plus band consistency.
    pub fn check(&self) -> Result<()> {
        self.validate()?;

        self.wave_height.optimal.check("wave_height.optimal")?;
        self.wave_height.acceptable.check("wave_height.acceptable")?;
        self.swell_period.optimal.check("swell_period.optimal")?;
        check_minimum("swell_height.acceptable_min", self.swell_height.acceptable_min)?;
        check_minimum("swell_period.acceptable_min", self.swell_period.acceptable_min)?;

        if !self.wave_height.acceptable.encloses(&self.wave_height.optimal) {
            return Err(ProcessingError::Config(
                "wave_height.optimal must lie inside wave_height.acceptable".to_string(),
            ));
        }

        if self.swell_period.acceptable_min > self.swell_period.optimal.min {
            return Err(ProcessingError::Config(format!(
                "swell_period.acceptable_min {} exceeds the optimal band minimum {}",
                self.swell_period.acceptable_min, self.swell_period.optimal.min
            )));
        }

        Ok(())
    }
}

// `range` lets NaN through
fn check_minimum(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(ProcessingError::Config(format!(
            "{} must be a finite number, got {}",
            name, value
        )));
    }
    Ok(())
}
