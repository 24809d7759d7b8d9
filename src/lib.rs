//! Portfolio Engines - calculation core for portfolio calculators
//!
//! This library provides:
//! - Monthly compound-interest projections, single-rate and per-bucket
//! - Mortgage payoff versus market investment decisions
//! - Ranked fuzzy search over a tradable-symbol catalog
//! - Batch scenario runs over projection configurations

pub mod config;
pub mod error;
pub mod projection;
pub mod payoff;
pub mod symbols;
pub mod scenario;

// Re-export commonly used types
pub use config::Settings;
pub use error::{Error, Result};
pub use projection::{project, ProjectionConfig, ProjectionEngine, ProjectionPoint, ProjectionResult};
pub use payoff::{decide, DebtTrack, Decision, DecisionEngine, DecisionParams, TrackKind, Verdict};
pub use symbols::{search, SymbolCatalog, SymbolMatcher, SymbolRecord, SymbolType};
pub use scenario::ScenarioRunner;
