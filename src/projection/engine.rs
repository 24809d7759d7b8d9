//! Core projection engine for monthly compound-growth projections

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::ProjectionLimits;
use super::points::{BucketOutcome, ProjectionPoint, ProjectionResult};
use super::state::{contribution_shares, BucketState};

/// Configuration for a single-rate projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Starting principal
    pub initial_principal: f64,

    /// Amount added at the end of every month
    pub monthly_contribution: f64,

    /// Nominal annual rate in percent, compounded monthly at rate / 12
    pub annual_rate_percent: f64,

    /// Horizon in years, clamped to the engine's limits
    pub years: u32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            initial_principal: 0.0,
            monthly_contribution: 0.0,
            annual_rate_percent: 7.0,
            years: 10,
        }
    }
}

/// A named slice of the starting principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub name: String,
    pub principal: f64,
}

impl Bucket {
    pub fn new(name: impl Into<String>, principal: f64) -> Self {
        Self {
            name: name.into(),
            principal,
        }
    }
}

/// Expected annual returns keyed by bucket name
///
/// Buckets without an entry use `default_rate_percent`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketRates {
    pub default_rate_percent: f64,
    #[serde(default)]
    pub rates: BTreeMap<String, f64>,
}

impl BucketRates {
    pub fn new(default_rate_percent: f64) -> Self {
        Self {
            default_rate_percent,
            rates: BTreeMap::new(),
        }
    }

    pub fn with_rate(mut self, bucket: impl Into<String>, rate_percent: f64) -> Self {
        self.rates.insert(bucket.into(), rate_percent);
        self
    }

    pub fn rate_for(&self, bucket: &str) -> f64 {
        self.rates.get(bucket).copied().unwrap_or(self.default_rate_percent)
    }
}

/// Configuration for a multi-bucket projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketConfig {
    pub buckets: Vec<Bucket>,
    pub monthly_contribution: f64,
    pub rates: BucketRates,
    pub years: u32,
}

/// Main projection engine
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    limits: ProjectionLimits,
}

impl ProjectionEngine {
    pub fn new(limits: ProjectionLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ProjectionLimits {
        &self.limits
    }

    /// Project a single principal at one rate
    pub fn project(&self, config: &ProjectionConfig) -> ProjectionResult {
        let state = BucketState::new("total", config.initial_principal, config.annual_rate_percent, 1.0);
        self.run(vec![state], config.monthly_contribution, config.years)
    }

    /// Project several buckets, each compounding at its own rate
    ///
    /// The shared contribution is split by each bucket's share of the initial
    /// principal. Shares are computed once and never re-derived as values drift.
    pub fn project_buckets(&self, config: &BucketConfig) -> ProjectionResult {
        if config.buckets.is_empty() {
            let state = BucketState::new("default", 0.0, config.rates.default_rate_percent, 1.0);
            return self.run(vec![state], config.monthly_contribution, config.years);
        }

        let principals: Vec<f64> = config.buckets.iter().map(|b| b.principal).collect();
        let shares = contribution_shares(&principals);

        let states = config
            .buckets
            .iter()
            .zip(shares)
            .map(|(bucket, share)| {
                BucketState::new(bucket.name.clone(), bucket.principal, config.rates.rate_for(&bucket.name), share)
            })
            .collect();

        self.run(states, config.monthly_contribution, config.years)
    }

    fn run(&self, mut states: Vec<BucketState>, monthly_contribution: f64, years: u32) -> ProjectionResult {
        let years = self.limits.clamp_years(years);
        let months = years * 12;
        let initial_principal: f64 = states.iter().map(|s| s.initial_principal).sum();

        log::debug!(
            "Projecting {} bucket(s) over {} months, principal {:.2}, contribution {:.2}",
            states.len(),
            months,
            initial_principal,
            monthly_contribution
        );

        let mut result = ProjectionResult::new(initial_principal);
        result.points.reserve(months as usize);

        for month in 1..=months {
            for state in states.iter_mut() {
                state.advance_month(monthly_contribution);
            }

            let total: f64 = states.iter().map(|s| s.value).sum();
            // Multiplied, not accumulated, so contributions stay exact
            let contributions = monthly_contribution * month as f64;
            result.add_point(ProjectionPoint::new(month, total, initial_principal, contributions));
        }

        result.buckets = states
            .into_iter()
            .map(|s| BucketOutcome {
                name: s.name,
                initial_principal: s.initial_principal,
                annual_rate_percent: s.annual_rate_percent,
                contribution_share: s.contribution_share,
                final_value: s.value,
            })
            .collect();

        result
    }
}

/// Project with default limits, returning the monthly points
pub fn project(
    initial_principal: f64,
    monthly_contribution: f64,
    annual_rate_percent: f64,
    years: u32,
) -> Vec<ProjectionPoint> {
    let config = ProjectionConfig {
        initial_principal,
        monthly_contribution,
        annual_rate_percent,
        years,
    };
    ProjectionEngine::default().project(&config).points
}

/// Multi-bucket projection with default limits
pub fn project_buckets(
    buckets: &[Bucket],
    monthly_contribution: f64,
    rates: &BucketRates,
    years: u32,
) -> ProjectionResult {
    let config = BucketConfig {
        buckets: buckets.to_vec(),
        monthly_contribution,
        rates: rates.clone(),
        years,
    };
    ProjectionEngine::default().project_buckets(&config)
}
