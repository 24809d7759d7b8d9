//! Scenario runner for batch projections
//!
//! Holds one engine and runs many projection configurations against it,
//! in parallel, returning results in input order.

use rayon::prelude::*;

use crate::config::Settings;
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};

/// Pre-configured runner for batch projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
///
/// // Compare conservative, moderate and aggressive returns
/// let results = runner.sweep_rates(&base, &[4.0, 7.0, 10.0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    /// Create runner with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Create runner from loaded settings
    pub fn with_settings(settings: &Settings) -> Self {
        Self {
            engine: ProjectionEngine::new(settings.projection),
        }
    }

    /// Run a single projection
    pub fn run(&self, config: &ProjectionConfig) -> ProjectionResult {
        self.engine.project(config)
    }

    /// Run many configurations in parallel
    pub fn run_batch(&self, configs: &[ProjectionConfig]) -> Vec<ProjectionResult> {
        configs.par_iter().map(|config| self.engine.project(config)).collect()
    }

    /// Run the base configuration once per annual rate
    pub fn sweep_rates(&self, base: &ProjectionConfig, rates_percent: &[f64]) -> Vec<(f64, ProjectionResult)> {
        rates_percent
            .par_iter()
            .map(|&rate| {
                let config = ProjectionConfig {
                    annual_rate_percent: rate,
                    ..base.clone()
                };
                (rate, self.engine.project(&config))
            })
            .collect()
    }

    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }
}
