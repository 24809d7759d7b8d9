//! Simulation state for a single bucket

/// State of one bucket at a point in time during projection
#[derive(Debug, Clone)]
pub struct BucketState {
    pub name: String,

    /// Principal at projection start
    pub initial_principal: f64,

    /// Annual rate in percent
    pub annual_rate_percent: f64,

    /// Monthly rate as a decimal (annual / 12, not the geometric equivalent)
    pub monthly_rate: f64,

    /// Fraction of the shared contribution routed here, fixed for the whole horizon
    pub contribution_share: f64,

    /// Current value
    pub value: f64,
}

impl BucketState {
    pub fn new(name: impl Into<String>, principal: f64, annual_rate_percent: f64, contribution_share: f64) -> Self {
        Self {
            name: name.into(),
            initial_principal: principal,
            annual_rate_percent,
            monthly_rate: annual_rate_percent / 100.0 / 12.0,
            contribution_share,
            value: principal,
        }
    }

    /// Compound one month then add this bucket's part of the contribution
    pub fn advance_month(&mut self, monthly_contribution: f64) {
        self.value = self.value * (1.0 + self.monthly_rate) + monthly_contribution * self.contribution_share;
    }
}

/// Contribution shares proportional to initial principal
///
/// Equal split when the total principal is zero.
pub fn contribution_shares(principals: &[f64]) -> Vec<f64> {
    if principals.is_empty() {
        return Vec::new();
    }

    let total: f64 = principals.iter().sum();
    if total <= 0.0 {
        let equal = 1.0 / principals.len() as f64;
        return vec![equal; principals.len()];
    }

    principals.iter().map(|p| p / total).collect()
}
