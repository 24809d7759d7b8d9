//! Symbol catalog and fuzzy autocomplete search

mod record;
mod normalize;
mod distance;
mod matcher;
pub mod loader;

pub use record::{SymbolRecord, SymbolType};
pub use normalize::{base_symbol, SearchKeys};
pub use distance::{bounded_levenshtein, levenshtein};
pub use matcher::{search, MatchReason, ScoredCandidate, SymbolMatcher, MAX_RESULTS_CAP};
pub use loader::{CatalogEntry, SymbolCatalog};
