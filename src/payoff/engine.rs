//! Payoff-vs-invest decision engine
//!
//! Compares paying down mortgage tracks (highest effective rate first) with
//! investing the same lump sum in the market over a common horizon.

use serde::{Deserialize, Serialize};

use crate::config::PayoffSettings;
use super::breakeven::break_even_yield;
use super::decision::{Decision, InvestmentOutcome, PayoffAllocation, Verdict};
use super::track::DebtTrack;

/// Investment side of the comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionParams {
    /// Lump sum available to pay down debt or invest
    pub investable_amount: f64,

    /// Expected nominal market yield in percent
    pub market_yield_percent: f64,

    /// Comparison window; None or non-positive uses the weighted track term
    #[serde(default)]
    pub horizon_years: Option<f64>,

    pub inflation_percent: f64,

    pub capital_gains_tax_percent: f64,
}

impl Default for DecisionParams {
    fn default() -> Self {
        Self {
            investable_amount: 0.0,
            market_yield_percent: 7.0,
            horizon_years: None,
            inflation_percent: 3.0,
            capital_gains_tax_percent: 25.0,
        }
    }
}

/// Main decision engine
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    settings: PayoffSettings,
}

impl DecisionEngine {
    pub fn new(settings: PayoffSettings) -> Self {
        Self { settings }
    }

    /// Run the comparison for the given tracks
    pub fn decide(&self, tracks: &[DebtTrack], params: &DecisionParams) -> Decision {
        let rated: Vec<(&DebtTrack, f64)> = tracks
            .iter()
            .filter(|t| t.balance > 0.0)
            .map(|t| (t, t.effective_rate(params.inflation_percent)))
            .collect();

        let total_debt: f64 = rated.iter().map(|(t, _)| t.balance).sum();
        if total_debt <= 0.0 {
            return Decision::neutral(Verdict::NoMortgage);
        }

        let weighted_rate = rated.iter().map(|(t, rate)| rate * t.balance).sum::<f64>() / total_debt;
        let weighted_years = rated.iter().map(|(t, _)| t.term_years * t.balance).sum::<f64>() / total_debt;
        let horizon_years = self.resolve_horizon(params.horizon_years, weighted_years);

        let mut decision = Decision::neutral(Verdict::NoAvailableAmount);
        decision.total_debt = total_debt;
        decision.weighted_rate = weighted_rate;
        decision.weighted_years = weighted_years;
        decision.horizon_years = horizon_years;

        if params.investable_amount <= 0.0 {
            return decision;
        }

        let invest_amount = if params.investable_amount > total_debt {
            log::debug!(
                "Capping available amount {:.2} at total debt {:.2}",
                params.investable_amount,
                total_debt
            );
            decision.warnings.push(format!(
                "Available amount {:.2} exceeds total debt {:.2}; capped at the debt ceiling",
                params.investable_amount, total_debt
            ));
            total_debt
        } else {
            params.investable_amount
        };
        decision.invest_amount = invest_amount;

        let allocations = allocate_payoff(rated, invest_amount, horizon_years);
        let paid: f64 = allocations.iter().map(|a| a.amount).sum();
        decision.mortgage_savings = allocations.iter().map(|a| a.profit).sum();
        decision.avg_saved_rate = if paid > 0.0 {
            allocations.iter().map(|a| a.effective_rate * a.amount).sum::<f64>() / paid
        } else {
            0.0
        };
        decision.allocations = allocations;

        decision.investment = investment_outcome(
            invest_amount,
            params.market_yield_percent,
            horizon_years,
            params.inflation_percent,
            params.capital_gains_tax_percent,
        );

        let margin = decision.investment.net_profit - decision.mortgage_savings;
        decision.verdict = if margin.abs() <= self.settings.tie_tolerance {
            Verdict::Tie
        } else if margin > 0.0 {
            Verdict::Invest
        } else {
            Verdict::Payoff
        };
        decision.advantage = margin.abs();

        decision.break_even_yield = break_even_yield(
            invest_amount,
            horizon_years,
            params.inflation_percent,
            params.capital_gains_tax_percent,
            decision.mortgage_savings,
        );

        decision
    }

    fn resolve_horizon(&self, requested: Option<f64>, weighted_years: f64) -> f64 {
        match requested {
            Some(years) if years > 0.0 => years,
            _ if weighted_years > 0.0 => weighted_years,
            _ => self.settings.horizon_floor_years,
        }
    }
}

/// Greedy payoff, highest effective rate first
///
/// Ties keep input order. Each track absorbs at most its balance.
fn allocate_payoff(mut rated: Vec<(&DebtTrack, f64)>, amount: f64, horizon_years: f64) -> Vec<PayoffAllocation> {
    rated.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut remaining = amount;
    let mut allocations = Vec::new();

    for (track, rate) in rated {
        if remaining <= 0.0 {
            break;
        }

        let pay = remaining.min(track.balance);
        remaining -= pay;

        // A track without a known term saves interest for the whole horizon
        let years_used = if track.term_years > 0.0 {
            horizon_years.min(track.term_years)
        } else {
            horizon_years
        };
        let future_value = pay * (1.0 + rate / 100.0).powf(years_used);

        allocations.push(PayoffAllocation {
            track_id: track.id,
            amount: pay,
            effective_rate: rate,
            years_used,
            future_value,
            profit: future_value - pay,
        });
    }

    allocations
}

/// Grow `amount` at the market yield and tax only the gain above inflation
pub fn investment_outcome(
    amount: f64,
    market_yield_percent: f64,
    horizon_years: f64,
    inflation_percent: f64,
    tax_percent: f64,
) -> InvestmentOutcome {
    if amount <= 0.0 || horizon_years <= 0.0 {
        return InvestmentOutcome::default();
    }

    let gross_future_value = amount * (1.0 + market_yield_percent / 100.0).powf(horizon_years);
    let inflated_principal = amount * (1.0 + inflation_percent / 100.0).powf(horizon_years);
    let real_gain = gross_future_value - inflated_principal;
    let tax = if real_gain > 0.0 {
        real_gain * tax_percent / 100.0
    } else {
        0.0
    };
    let net_profit = gross_future_value - tax - amount;

    let growth = (amount + net_profit) / amount;
    let net_cagr = if growth > 0.0 {
        (growth.powf(1.0 / horizon_years) - 1.0) * 100.0
    } else {
        -100.0
    };

    InvestmentOutcome {
        gross_future_value,
        inflated_principal,
        real_gain,
        tax,
        net_profit,
        net_cagr,
    }
}

/// Run the comparison with default settings
pub fn decide(tracks: &[DebtTrack], params: &DecisionParams) -> Decision {
    DecisionEngine::default().decide(tracks, params)
}
