//! Output structures for the payoff-vs-invest decision

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which option the comparison favours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Investing in the market yields more than paying down debt
    Invest,
    /// Paying down the highest-rate debt yields more
    Payoff,
    /// Both options come out even
    Tie,
    /// There is no outstanding debt to compare against
    NoMortgage,
    /// There is nothing to invest or pay off
    NoAvailableAmount,
}

impl Verdict {
    /// Whether the verdict carries a numeric comparison
    pub fn is_comparison(&self) -> bool {
        !matches!(self, Verdict::NoMortgage | Verdict::NoAvailableAmount)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Verdict::Invest => "Invest",
            Verdict::Payoff => "Pay off mortgage",
            Verdict::Tie => "Equivalent",
            Verdict::NoMortgage => "No mortgage",
            Verdict::NoAvailableAmount => "No available amount",
        };
        f.write_str(text)
    }
}

/// Amount routed to one track by the greedy allocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffAllocation {
    pub track_id: u32,
    pub amount: f64,
    /// Effective annual rate in percent
    pub effective_rate: f64,
    /// Years of interest avoided, `min(horizon, term)`
    pub years_used: f64,
    /// Guaranteed value of the avoided interest at the horizon
    pub future_value: f64,
    pub profit: f64,
}

/// Result of growing the amount in the market instead
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestmentOutcome {
    pub gross_future_value: f64,
    /// Principal grown at inflation; only gains above this are taxed
    pub inflated_principal: f64,
    pub real_gain: f64,
    pub tax: f64,
    pub net_profit: f64,
    /// Net compound annual growth rate in percent
    pub net_cagr: f64,
}

/// Complete decision result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub verdict: Verdict,

    /// Sum of balances over tracks with a positive balance
    pub total_debt: f64,

    /// Balance-weighted effective rate in percent
    pub weighted_rate: f64,

    /// Balance-weighted remaining term
    pub weighted_years: f64,

    /// Comparison window in years
    pub horizon_years: f64,

    /// Amount compared, capped at total debt
    pub invest_amount: f64,

    /// Tracks paid down, highest effective rate first
    pub allocations: Vec<PayoffAllocation>,

    /// Guaranteed savings from paying down debt
    pub mortgage_savings: f64,

    /// Allocation-weighted effective rate of the paid-down debt in percent
    pub avg_saved_rate: f64,

    pub investment: InvestmentOutcome,

    /// Absolute margin of the winning option (0 for neutral verdicts)
    pub advantage: f64,

    /// Market yield in percent at which both options are equal
    pub break_even_yield: Option<f64>,

    /// Advisory messages; never fatal
    pub warnings: Vec<String>,
}

impl Decision {
    /// Neutral decision carrying only the debt statistics
    pub fn neutral(verdict: Verdict) -> Self {
        Self {
            verdict,
            total_debt: 0.0,
            weighted_rate: 0.0,
            weighted_years: 0.0,
            horizon_years: 0.0,
            invest_amount: 0.0,
            allocations: Vec::new(),
            mortgage_savings: 0.0,
            avg_saved_rate: 0.0,
            investment: InvestmentOutcome::default(),
            advantage: 0.0,
            break_even_yield: None,
            warnings: Vec::new(),
        }
    }

    /// Margin of the winner relative to the amount compared, in percent
    pub fn advantage_percent(&self) -> f64 {
        if self.invest_amount > 0.0 {
            self.advantage / self.invest_amount * 100.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_verdicts_have_no_comparison() {
        assert!(!Verdict::NoMortgage.is_comparison());
        assert!(!Verdict::NoAvailableAmount.is_comparison());
        assert!(Verdict::Tie.is_comparison());
        assert_eq!(Verdict::NoMortgage.to_string(), "No mortgage");
    }

    #[test]
    fn test_advantage_percent_guards_zero_amount() {
        let decision = Decision::neutral(Verdict::NoAvailableAmount);
        assert_eq!(decision.advantage_percent(), 0.0);
    }
}
