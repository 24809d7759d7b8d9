//! Output structures for projections

use serde::{Deserialize, Serialize};

/// One month of projection output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    /// Projection month (1-indexed)
    pub month: u32,

    /// Projection year, `ceil(month / 12)`
    pub year: u32,

    /// Total value at end of month
    pub total: f64,

    /// Cumulative contributions through this month (excludes initial principal)
    pub contributions: f64,

    /// Growth earned so far: total - initial principal - contributions
    pub interest: f64,
}

impl ProjectionPoint {
    pub fn new(month: u32, total: f64, initial_principal: f64, contributions: f64) -> Self {
        Self {
            month,
            year: month.div_ceil(12),
            total,
            contributions,
            interest: total - initial_principal - contributions,
        }
    }
}

/// Final state of one bucket in a multi-bucket projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketOutcome {
    pub name: String,
    pub initial_principal: f64,
    /// Annual rate (percent) the bucket compounded at
    pub annual_rate_percent: f64,
    /// Fraction of the monthly contribution routed to this bucket
    pub contribution_share: f64,
    pub final_value: f64,
}

/// Complete projection result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Initial principal across all buckets
    pub initial_principal: f64,

    /// Monthly points, one per projected month
    pub points: Vec<ProjectionPoint>,

    /// Per-bucket outcomes (a single-rate projection reports one bucket)
    pub buckets: Vec<BucketOutcome>,
}

impl ProjectionResult {
    pub fn new(initial_principal: f64) -> Self {
        Self {
            initial_principal,
            points: Vec::new(),
            buckets: Vec::new(),
        }
    }

    pub fn add_point(&mut self, point: ProjectionPoint) {
        self.points.push(point);
    }

    /// Downsample to one point per year, taking the last month of each year
    pub fn yearly(&self) -> Vec<ProjectionPoint> {
        self.points
            .iter()
            .enumerate()
            .filter(|(idx, point)| {
                point.month % 12 == 0 || *idx + 1 == self.points.len()
            })
            .map(|(_, point)| *point)
            .collect()
    }

    pub fn final_point(&self) -> Option<&ProjectionPoint> {
        self.points.last()
    }

    /// Get summary statistics
    pub fn summary(&self, annual_rate_percent: f64) -> ProjectionSummary {
        let (final_total, total_contributions, total_interest) = self
            .points
            .last()
            .map(|p| (p.total, p.contributions, p.interest))
            .unwrap_or((self.initial_principal, 0.0, 0.0));

        ProjectionSummary {
            total_months: self.points.len() as u32,
            initial_principal: self.initial_principal,
            final_total,
            total_contributions,
            total_interest,
            effective_annual_rate: effective_annual_rate(annual_rate_percent),
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_months: u32,
    pub initial_principal: f64,
    pub final_total: f64,
    pub total_contributions: f64,
    pub total_interest: f64,
    /// Effective annual rate as a decimal, `(1 + r/12)^12 - 1`
    pub effective_annual_rate: f64,
}

/// Effective annual rate (decimal) of a nominal annual rate compounded monthly
pub fn effective_annual_rate(annual_rate_percent: f64) -> f64 {
    (1.0 + annual_rate_percent / 100.0 / 12.0).powi(12) - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_point_year_and_interest() {
        let p = ProjectionPoint::new(13, 1_200.0, 1_000.0, 150.0);
        assert_eq!(p.year, 2);
        assert_relative_eq!(p.interest, 50.0);

        assert_eq!(ProjectionPoint::new(12, 0.0, 0.0, 0.0).year, 1);
        assert_eq!(ProjectionPoint::new(1, 0.0, 0.0, 0.0).year, 1);
    }

    #[test]
    fn test_yearly_takes_last_month_of_each_year() {
        let mut result = ProjectionResult::new(0.0);
        for m in 1..=36 {
            result.add_point(ProjectionPoint::new(m, m as f64, 0.0, 0.0));
        }
        let yearly = result.yearly();
        let months: Vec<u32> = yearly.iter().map(|p| p.month).collect();
        assert_eq!(months, vec![12, 24, 36]);
    }

    #[test]
    fn test_effective_annual_rate() {
        assert_relative_eq!(effective_annual_rate(12.0), 1.01_f64.powi(12) - 1.0);
        assert_eq!(effective_annual_rate(0.0), 0.0);
    }

    #[test]
    fn test_empty_summary() {
        let summary = ProjectionResult::new(500.0).summary(5.0);
        assert_eq!(summary.total_months, 0);
        assert_eq!(summary.final_total, 500.0);
    }
}
