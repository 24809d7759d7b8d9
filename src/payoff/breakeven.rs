//! Break-even market yield
//!
//! Finds the market yield at which investing nets exactly the payoff savings.

use super::engine::investment_outcome;

/// Yield search bracket in percent
const LOW_YIELD: f64 = -99.0;
const HIGH_YIELD: f64 = 100.0;

/// Solve for the market yield (percent) where investment net profit equals `target_profit`
///
/// Net profit is non-decreasing in the yield, so plain bisection over the
/// bracket is enough. Returns None when the root is outside the bracket.
pub fn break_even_yield(
    amount: f64,
    horizon_years: f64,
    inflation_percent: f64,
    tax_percent: f64,
    target_profit: f64,
) -> Option<f64> {
    if amount <= 0.0 || horizon_years <= 0.0 {
        return None;
    }

    let gap = |yield_percent: f64| {
        investment_outcome(amount, yield_percent, horizon_years, inflation_percent, tax_percent).net_profit
            - target_profit
    };

    let mut low = LOW_YIELD;
    let mut high = HIGH_YIELD;
    let tolerance = 1e-9;
    let max_iterations = 200;

    let gap_low = gap(low);
    let gap_high = gap(high);

    if gap_low * gap_high > 0.0 {
        return None;
    }

    for _ in 0..max_iterations {
        let mid = (low + high) / 2.0;
        let gap_mid = gap(mid);

        if gap_mid.abs() < tolerance || (high - low) / 2.0 < tolerance {
            return Some(mid);
        }

        if gap_mid < 0.0 {
            low = mid;
        } else {
            high = mid;
        }
    }

    Some((low + high) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_break_even_without_tax_or_inflation_equals_debt_rate() {
        // 10 years of 5% guaranteed growth; untaxed investing must also earn 5%
        let savings = 10_000.0 * (1.05_f64.powi(10) - 1.0);
        let y = break_even_yield(10_000.0, 10.0, 0.0, 0.0, savings).unwrap();
        assert_abs_diff_eq!(y, 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_tax_raises_break_even() {
        let savings = 10_000.0 * (1.05_f64.powi(10) - 1.0);
        let y = break_even_yield(10_000.0, 10.0, 2.0, 25.0, savings).unwrap();
        assert!(y > 5.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(break_even_yield(0.0, 10.0, 0.0, 0.0, 100.0), None);
        assert_eq!(break_even_yield(1_000.0, 0.0, 0.0, 0.0, 100.0), None);
        // Unreachable even at the top of the bracket
        assert_eq!(break_even_yield(1.0, 1.0, 0.0, 0.0, 1e9), None);
    }
}
