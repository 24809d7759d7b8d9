//! Engine settings
//!
//! Defaults match the calculator behaviour; a JSON file may override any
//! subset of fields.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::symbols::MAX_RESULTS_CAP;

/// Default path for the settings file used by the CLI
pub const DEFAULT_SETTINGS_PATH: &str = "config/engines.json";

/// Container for all engine settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub projection: ProjectionLimits,
    pub payoff: PayoffSettings,
    pub matcher: MatcherSettings,
}

/// Bounds applied to the projection horizon
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionLimits {
    pub min_years: u32,
    pub max_years: u32,
}

impl Default for ProjectionLimits {
    fn default() -> Self {
        Self {
            min_years: 1,
            max_years: 50,
        }
    }
}

impl ProjectionLimits {
    /// Clamp a requested horizon into `[min_years, max_years]`
    pub fn clamp_years(&self, years: u32) -> u32 {
        years.clamp(self.min_years, self.max_years)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PayoffSettings {
    /// Horizon used when neither the caller nor the tracks supply one
    pub horizon_floor_years: f64,

    /// Profits closer than this (currency units) are reported as a tie
    pub tie_tolerance: f64,
}

impl Default for PayoffSettings {
    fn default() -> Self {
        Self {
            horizon_floor_years: 5.0,
            tie_tolerance: 0.005,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherSettings {
    pub max_results: usize,
    pub time_budget_ms: u64,
    /// Fuzzy matching only runs while fewer prefix-or-better hits exist
    pub fuzzy_hit_cutoff: usize,
    pub fuzzy_min_query_len: usize,
    pub substring_min_query_len: usize,
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self {
            max_results: 20,
            time_budget_ms: 30,
            fuzzy_hit_cutoff: 10,
            fuzzy_min_query_len: 3,
            substring_min_query_len: 2,
        }
    }
}

impl MatcherSettings {
    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults for missing fields
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let settings: Settings = serde_json::from_reader(std::io::BufReader::new(file))?;
        settings.validate()?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.projection.min_years == 0 {
            return Err(Error::InvalidSettings(
                "projection.min_years must be at least 1".to_string(),
            ));
        }
        if self.projection.min_years > self.projection.max_years {
            return Err(Error::InvalidSettings(format!(
                "projection.min_years ({}) exceeds projection.max_years ({})",
                self.projection.min_years, self.projection.max_years
            )));
        }
        if self.matcher.max_results == 0 || self.matcher.max_results > MAX_RESULTS_CAP {
            return Err(Error::InvalidSettings(format!(
                "matcher.max_results must be between 1 and {}, got {}",
                MAX_RESULTS_CAP, self.matcher.max_results
            )));
        }
        if !(self.payoff.horizon_floor_years > 0.0) {
            return Err(Error::InvalidSettings(
                "payoff.horizon_floor_years must be positive".to_string(),
            ));
        }
        if self.payoff.tie_tolerance < 0.0 {
            return Err(Error::InvalidSettings(
                "payoff.tie_tolerance must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
