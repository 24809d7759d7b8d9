//! Mortgage payoff versus market investment comparison

mod track;
mod engine;
mod decision;
mod breakeven;

pub use track::{DebtTrack, TrackKind};
pub use engine::{decide, investment_outcome, DecisionEngine, DecisionParams};
pub use decision::{Decision, InvestmentOutcome, PayoffAllocation, Verdict};
pub use breakeven::break_even_yield;
