//! Fuzzy symbol matcher for type-ahead search
//!
//! Each entry is scored by the first rule it satisfies, in priority order:
//! exact symbol, exact display form, base-symbol prefix, numeric id,
//! name prefix, substring, then bounded edit distance. Results are ranked,
//! merged variants of the same security are collapsed, and the list is cut
//! to the configured size. Scanning stops when the time budget runs out.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

use crate::config::MatcherSettings;
use super::distance::bounded_levenshtein;
use super::loader::{CatalogEntry, SymbolCatalog};
use super::normalize::{is_numeric, normalize, SearchKeys};
use super::record::SymbolRecord;

const SCORE_EXACT_SYMBOL: u32 = 2000;
const SCORE_EXACT_DISPLAY: u32 = 1900;
const SCORE_PREFIX_SHORT_QUERY: u32 = 1800;
const SCORE_PREFIX: u32 = 1700;
const SCORE_PREFIX_MIN: u32 = 1600;
const SCORE_NUMERIC_EXACT: u32 = 1500;
const SCORE_NUMERIC_PREFIX: u32 = 1400;
const NUMERIC_QUERY_BOOST: u32 = 300;
const SCORE_SHORT_NAME_PREFIX: u32 = 1200;
const SCORE_NAME_PREFIX: u32 = 1100;
const SCORE_NAME_WORD_PREFIX: u32 = 1000;
const SCORE_SYMBOL_CONTAINS: u32 = 900;
const SCORE_DISPLAY_CONTAINS: u32 = 850;
const SCORE_SHORT_NAME_CONTAINS: u32 = 800;
const SCORE_NAME_CONTAINS: u32 = 700;
const SCORE_TERM_CONTAINS: u32 = 600;
const SCORE_FUZZY: u32 = 500;
const FUZZY_PENALTY_PER_EDIT: u32 = 100;

/// Scores at or above this count as exact/prefix hits for the fuzzy gate
const PREFIX_HIT_THRESHOLD: u32 = SCORE_NAME_WORD_PREFIX;

/// Hard cap on the result list, whatever the settings say
pub const MAX_RESULTS_CAP: usize = 20;

/// How often the deadline is checked while scanning
const DEADLINE_CHECK_INTERVAL: usize = 64;

/// Which rule produced a candidate's score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchReason {
    ExactSymbol,
    ExactDisplay,
    SymbolPrefix,
    NumericId,
    NamePrefix,
    Substring,
    Fuzzy { edits: usize },
}

impl fmt::Display for MatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchReason::ExactSymbol => f.write_str("exact symbol"),
            MatchReason::ExactDisplay => f.write_str("exact display symbol"),
            MatchReason::SymbolPrefix => f.write_str("symbol prefix"),
            MatchReason::NumericId => f.write_str("numeric id"),
            MatchReason::NamePrefix => f.write_str("name prefix"),
            MatchReason::Substring => f.write_str("substring"),
            MatchReason::Fuzzy { edits } => write!(f, "fuzzy ({} edit{})", edits, if *edits == 1 { "" } else { "s" }),
        }
    }
}

/// A catalog entry that matched the current query
#[derive(Debug, Clone, Copy)]
pub struct ScoredCandidate<'a> {
    pub record: &'a SymbolRecord,
    pub score: u32,
    pub reason: MatchReason,
}

#[derive(Debug, Clone, Copy)]
struct Hit<'a> {
    entry: &'a CatalogEntry,
    index: usize,
    score: u32,
    reason: MatchReason,
}

/// Ranked symbol search over a catalog snapshot
#[derive(Debug, Clone, Default)]
pub struct SymbolMatcher {
    settings: MatcherSettings,
}

impl SymbolMatcher {
    pub fn new(settings: MatcherSettings) -> Self {
        Self { settings }
    }

    /// Ranked matching records, cloned out of the catalog
    pub fn search(&self, catalog: &SymbolCatalog, query: &str) -> Vec<SymbolRecord> {
        self.search_scored(catalog, query)
            .into_iter()
            .map(|c| c.record.clone())
            .collect()
    }

    /// Ranked matches with their scores and reasons
    pub fn search_scored<'a>(&self, catalog: &'a SymbolCatalog, query: &str) -> Vec<ScoredCandidate<'a>> {
        let query = normalize(query);
        if query.is_empty() || catalog.is_empty() {
            return Vec::new();
        }

        let started = Instant::now();
        let budget = self.settings.time_budget();
        let query_len = query.chars().count();
        let numeric_query = is_numeric(&query);

        let entries = catalog.entries();
        let mut scored: Vec<Option<(u32, MatchReason)>> = vec![None; entries.len()];
        let mut prefix_hits = 0;
        let mut out_of_time = false;

        for (idx, entry) in entries.iter().enumerate() {
            if idx % DEADLINE_CHECK_INTERVAL == 0 && idx > 0 && started.elapsed() > budget {
                log::warn!(
                    "Symbol search for {:?} exceeded {:?}; skipped {} of {} entries",
                    query,
                    budget,
                    entries.len() - idx,
                    entries.len()
                );
                out_of_time = true;
                break;
            }

            if let Some((score, reason)) = self.score_direct(&entry.keys, &query, query_len, numeric_query) {
                if score >= PREFIX_HIT_THRESHOLD {
                    prefix_hits += 1;
                }
                scored[idx] = Some((score, reason));
            }
        }

        let fuzzy_allowed = query_len >= self.settings.fuzzy_min_query_len
            && prefix_hits < self.settings.fuzzy_hit_cutoff
            && !out_of_time;

        if fuzzy_allowed {
            for (idx, entry) in entries.iter().enumerate() {
                if idx % DEADLINE_CHECK_INTERVAL == 0 && idx > 0 && started.elapsed() > budget {
                    log::warn!("Fuzzy pass for {:?} exceeded {:?}; stopped at entry {}", query, budget, idx);
                    break;
                }
                if scored[idx].is_none() {
                    scored[idx] = score_fuzzy(&entry.keys, &query, query_len);
                }
            }
        } else {
            log::debug!(
                "Fuzzy pass skipped for {:?} ({} prefix hits, query length {})",
                query,
                prefix_hits,
                query_len
            );
        }

        let mut hits: Vec<Hit> = scored
            .into_iter()
            .enumerate()
            .filter_map(|(index, s)| {
                s.map(|(score, reason)| Hit {
                    entry: &entries[index],
                    index,
                    score,
                    reason,
                })
            })
            .collect();

        hits.sort_by(rank_order);

        let mut ranked = collapse_variants(hits);
        ranked.sort_by(rank_order);
        ranked.truncate(self.settings.max_results.min(MAX_RESULTS_CAP));

        ranked
            .into_iter()
            .map(|hit| ScoredCandidate {
                record: &hit.entry.record,
                score: hit.score,
                reason: hit.reason,
            })
            .collect()
    }

    /// Rules 1 to 6; the first rule that matches decides the score
    fn score_direct(
        &self,
        keys: &SearchKeys,
        query: &str,
        query_len: usize,
        numeric_query: bool,
    ) -> Option<(u32, MatchReason)> {
        if keys.symbol == query || keys.base == query {
            return Some((SCORE_EXACT_SYMBOL, MatchReason::ExactSymbol));
        }

        if keys.display.as_deref() == Some(query) {
            return Some((SCORE_EXACT_DISPLAY, MatchReason::ExactDisplay));
        }

        if keys.base.starts_with(query) {
            return Some((prefix_score(keys.base.chars().count(), query_len), MatchReason::SymbolPrefix));
        }

        if let Some(id) = keys.numeric_id.as_deref() {
            let score = if id == query {
                Some(SCORE_NUMERIC_EXACT)
            } else if id.starts_with(query) {
                Some(SCORE_NUMERIC_PREFIX)
            } else {
                None
            };
            if let Some(score) = score {
                let boost = if numeric_query { NUMERIC_QUERY_BOOST } else { 0 };
                return Some((score + boost, MatchReason::NumericId));
            }
        }

        if keys.short_name.starts_with(query) {
            return Some((SCORE_SHORT_NAME_PREFIX, MatchReason::NamePrefix));
        }
        if keys.name.starts_with(query) {
            return Some((SCORE_NAME_PREFIX, MatchReason::NamePrefix));
        }
        if keys.name_words.iter().any(|w| w.starts_with(query)) {
            return Some((SCORE_NAME_WORD_PREFIX, MatchReason::NamePrefix));
        }

        if query_len < self.settings.substring_min_query_len {
            return None;
        }

        let substring_score = if keys.symbol.contains(query) {
            Some(SCORE_SYMBOL_CONTAINS)
        } else if keys.display.as_deref().is_some_and(|d| d.contains(query)) {
            Some(SCORE_DISPLAY_CONTAINS)
        } else if keys.short_name.contains(query) {
            Some(SCORE_SHORT_NAME_CONTAINS)
        } else if keys.name.contains(query) {
            Some(SCORE_NAME_CONTAINS)
        } else if keys.terms.iter().any(|t| t.contains(query)) {
            Some(SCORE_TERM_CONTAINS)
        } else {
            None
        };

        substring_score.map(|score| (score, MatchReason::Substring))
    }
}

/// 1800 for one- and two-char queries, 1700 otherwise, minus 20 per
/// unmatched trailing char (at most 100) so short tickers sort above long ones
fn prefix_score(base_len: usize, query_len: usize) -> u32 {
    let start = if query_len <= 2 {
        SCORE_PREFIX_SHORT_QUERY
    } else {
        SCORE_PREFIX
    };
    let extra = base_len.saturating_sub(query_len) as u32;
    start.saturating_sub((extra * 20).min(100)).max(SCORE_PREFIX_MIN)
}

/// Allowed edits: 1 below five chars, 2 otherwise, and always under 40% of the query
fn max_edits(query_len: usize) -> usize {
    let allowed = if query_len < 5 { 1 } else { 2 };
    let mut edits = allowed;
    while edits > 0 && (edits as f64) >= 0.4 * query_len as f64 {
        edits -= 1;
    }
    edits
}

fn score_fuzzy(keys: &SearchKeys, query: &str, query_len: usize) -> Option<(u32, MatchReason)> {
    let max = max_edits(query_len);
    if max == 0 {
        return None;
    }

    let candidates = std::iter::once(keys.base.as_str())
        .chain(std::iter::once(keys.short_name.as_str()))
        .chain(keys.name_words.iter().map(String::as_str).filter(|w| w.chars().count() >= 3));

    let best = candidates
        .filter_map(|candidate| bounded_levenshtein(query, candidate, max))
        .min()?;

    let score = SCORE_FUZZY - FUZZY_PENALTY_PER_EDIT * best as u32;
    Some((score, MatchReason::Fuzzy { edits: best }))
}

/// Score descending, then shorter normalized symbol, then symbol text, then catalog order
///
/// An exact symbol is never longer than a base-only match of the same query,
/// so it ranks first among equal scores.
fn rank_order(a: &Hit<'_>, b: &Hit<'_>) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.entry.keys.symbol.len().cmp(&b.entry.keys.symbol.len()))
        .then_with(|| a.entry.keys.symbol.cmp(&b.entry.keys.symbol))
        .then_with(|| a.index.cmp(&b.index))
}

/// Drop bare listings that also appear in merged display form
///
/// Only a bare/merged pair of the same security collapses, and the merged
/// entry keeps its own score and reason. Listings of equal richness all stay.
fn collapse_variants(hits: Vec<Hit<'_>>) -> Vec<Hit<'_>> {
    let mut out: Vec<Option<Hit>> = Vec::with_capacity(hits.len());
    let mut bare: HashMap<(String, String), Vec<usize>> = HashMap::new();
    let mut merged: HashMap<(String, String), usize> = HashMap::new();

    for hit in hits {
        let key = hit.entry.keys.entity_key();
        if hit.entry.record.is_merged() {
            if merged.contains_key(&key) {
                out.push(Some(hit));
                continue;
            }
            // Replace the first bare variant in place, drop the rest
            let positions = bare.remove(&key).unwrap_or_default();
            match positions.split_first() {
                Some((&first, rest)) => {
                    out[first] = Some(hit);
                    for &pos in rest {
                        out[pos] = None;
                    }
                    merged.insert(key, first);
                }
                None => {
                    merged.insert(key, out.len());
                    out.push(Some(hit));
                }
            }
        } else if !merged.contains_key(&key) {
            bare.entry(key).or_default().push(out.len());
            out.push(Some(hit));
        }
    }

    out.into_iter().flatten().collect()
}

/// Search with default settings
pub fn search(catalog: &SymbolCatalog, query: &str) -> Vec<SymbolRecord> {
    SymbolMatcher::default().search(catalog, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::record::SymbolType;

    fn catalog() -> SymbolCatalog {
        SymbolCatalog::new(vec![
            SymbolRecord::new("AAPL", "Apple Inc.", "Apple", SymbolType::Nasdaq, "USD")
                .with_search_terms(["iphone"]),
            SymbolRecord::new("AAL", "American Airlines Group", "American Airlines", SymbolType::Nasdaq, "USD"),
            SymbolRecord::new("A", "Agilent Technologies", "Agilent", SymbolType::Nyse, "USD"),
            SymbolRecord::new("AA", "Alcoa Corporation", "Alcoa", SymbolType::Nyse, "USD"),
            SymbolRecord::new("MSFT", "Microsoft Corporation", "Microsoft", SymbolType::Nasdaq, "USD"),
            SymbolRecord::new("TSLA", "Tesla Inc.", "Tesla", SymbolType::Nasdaq, "USD"),
            SymbolRecord::new("1081124", "Elbit Systems", "ELBIT", SymbolType::Tase, "ILS"),
            SymbolRecord::new("1081124", "Elbit Systems", "ELBIT", SymbolType::Tase, "ILS")
                .with_display_symbol("1081124 Elbit Systems"),
            SymbolRecord::new("TEVA.TA", "Teva Pharmaceutical", "Teva", SymbolType::Tase, "ILS")
                .with_display_symbol("629014 Teva Pharmaceutical"),
            SymbolRecord::new("BTC-USD", "Bitcoin", "Bitcoin", SymbolType::Crypto, "USD"),
        ])
    }

    #[test]
    fn test_empty_query_and_catalog() {
        assert!(search(&catalog(), "   ").is_empty());
        assert!(search(&SymbolCatalog::default(), "aapl").is_empty());
    }

    #[test]
    fn test_exact_symbol_ranks_first() {
        let catalog = catalog();
        for query in ["AA", "a", "AAPL", "msft", "btc-usd", "btc"] {
            let results = SymbolMatcher::default().search_scored(&catalog, query);
            assert!(!results.is_empty(), "no results for {}", query);
            assert_eq!(results[0].reason, MatchReason::ExactSymbol, "query {}", query);
            assert_eq!(results[0].score, SCORE_EXACT_SYMBOL);
        }

        let results = search(&catalog, "aa");
        assert_eq!(results[0].symbol, "AA");
    }

    #[test]
    fn test_shorter_prefix_matches_rank_higher() {
        let results = search(&catalog(), "aa");
        let symbols: Vec<&str> = results.iter().map(|r| r.symbol.as_str()).collect();
        let aal = symbols.iter().position(|s| *s == "AAL").unwrap();
        let aapl = symbols.iter().position(|s| *s == "AAPL").unwrap();
        assert!(aal < aapl);
    }

    #[test]
    fn test_prefix_score_range() {
        assert_eq!(prefix_score(2, 1), 1780);
        assert_eq!(prefix_score(20, 1), 1700);
        assert_eq!(prefix_score(4, 3), 1680);
        assert_eq!(prefix_score(30, 3), 1600);
    }

    #[test]
    fn test_numeric_query_matches_display_id() {
        let catalog = catalog();
        let results = SymbolMatcher::default().search_scored(&catalog, "6290");
        assert_eq!(results[0].record.symbol, "TEVA.TA");
        assert_eq!(results[0].reason, MatchReason::NumericId);
        assert_eq!(results[0].score, SCORE_NUMERIC_PREFIX + NUMERIC_QUERY_BOOST);
    }

    #[test]
    fn test_merged_variant_replaces_bare_one() {
        let results = search(&catalog(), "1081124");
        let elbit: Vec<_> = results.iter().filter(|r| r.name == "Elbit Systems").collect();
        assert_eq!(elbit.len(), 1);
        assert!(elbit[0].is_merged());
    }

    #[test]
    fn test_exact_symbol_beats_earlier_base_only_match() {
        let catalog = SymbolCatalog::new(vec![
            SymbolRecord::new("BTC-USD", "Bitcoin", "Bitcoin", SymbolType::Crypto, "USD"),
            SymbolRecord::new("BTC", "Grayscale Bitcoin Mini Trust", "Grayscale BTC", SymbolType::Nyse, "USD"),
        ]);
        let results = SymbolMatcher::default().search_scored(&catalog, "btc");
        let symbols: Vec<&str> = results.iter().map(|c| c.record.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["BTC", "BTC-USD"]);
    }

    #[test]
    fn test_bare_listings_sharing_a_base_all_survive() {
        let catalog = SymbolCatalog::new(vec![
            SymbolRecord::new("BTC-USD", "Bitcoin", "Bitcoin", SymbolType::Crypto, "USD"),
            SymbolRecord::new("BTC-EUR", "Bitcoin", "Bitcoin", SymbolType::Crypto, "EUR"),
        ]);
        let mut symbols: Vec<String> = search(&catalog, "bitcoin").into_iter().map(|r| r.symbol).collect();
        symbols.sort();
        assert_eq!(symbols, vec!["BTC-EUR", "BTC-USD"]);
    }

    #[test]
    fn test_merged_variant_reports_its_own_match() {
        let catalog = SymbolCatalog::new(vec![
            SymbolRecord::new("629014", "Teva Pharmaceutical", "Teva", SymbolType::Tase, "ILS"),
            SymbolRecord::new("TEVA.TA", "Teva Pharmaceutical", "Teva", SymbolType::Tase, "ILS")
                .with_display_symbol("629014 Teva Pharmaceutical"),
        ]);
        // The bare listing is exact on its symbol; the merged one only on its numeric id
        let results = SymbolMatcher::default().search_scored(&catalog, "629014");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].record.symbol, "TEVA.TA");
        assert_eq!(results[0].reason, MatchReason::NumericId);
        assert_eq!(results[0].score, SCORE_NUMERIC_EXACT + NUMERIC_QUERY_BOOST);
    }

    #[test]
    fn test_oversized_max_results_is_capped() {
        let records: Vec<SymbolRecord> = (0..100)
            .map(|i| SymbolRecord::new(format!("QX{}", i), format!("Quux {}", i), "Quux", SymbolType::Nyse, "USD"))
            .collect();
        let catalog = SymbolCatalog::new(records);
        let matcher = SymbolMatcher::new(MatcherSettings {
            max_results: 100,
            ..MatcherSettings::default()
        });
        assert_eq!(matcher.search(&catalog, "qx").len(), MAX_RESULTS_CAP);
    }

    #[test]
    fn test_name_and_substring_matches() {
        let catalog = catalog();
        let results = SymbolMatcher::default().search_scored(&catalog, "micro");
        assert_eq!(results[0].record.symbol, "MSFT");
        assert_eq!(results[0].reason, MatchReason::NamePrefix);

        let results = SymbolMatcher::default().search_scored(&catalog, "phone");
        assert_eq!(results[0].record.symbol, "AAPL");
        assert_eq!(results[0].score, SCORE_TERM_CONTAINS);
    }

    #[test]
    fn test_single_char_skips_substring() {
        // "z" appears in no prefix and substring needs two chars
        assert!(search(&catalog(), "z").is_empty());
    }

    #[test]
    fn test_fuzzy_match_on_typo() {
        let catalog = catalog();
        let results = SymbolMatcher::default().search_scored(&catalog, "tesls");
        assert_eq!(results[0].record.symbol, "TSLA");
        assert_eq!(results[0].reason, MatchReason::Fuzzy { edits: 1 });

        // Three chars allow one edit; two do not
        assert!(search(&self::catalog(), "mf").is_empty());
    }

    #[test]
    fn test_max_edits() {
        assert_eq!(max_edits(2), 0);
        assert_eq!(max_edits(3), 1);
        assert_eq!(max_edits(4), 1);
        assert_eq!(max_edits(5), 1);
        assert_eq!(max_edits(6), 2);
    }

    #[test]
    fn test_fuzzy_skipped_when_enough_prefix_hits() {
        let records: Vec<SymbolRecord> = (0..15)
            .map(|i| SymbolRecord::new(format!("ABC{}", i), format!("Alpha {}", i), "Alpha", SymbolType::Nyse, "USD"))
            .chain(std::iter::once(SymbolRecord::new("ABD", "Bravo", "Bravo", SymbolType::Nyse, "USD")))
            .collect();
        let catalog = SymbolCatalog::new(records);
        let results = SymbolMatcher::default().search_scored(&catalog, "abc");
        assert!(results.iter().all(|c| !matches!(c.reason, MatchReason::Fuzzy { .. })));
    }

    #[test]
    fn test_results_bounded() {
        let records: Vec<SymbolRecord> = (0..500)
            .map(|i| SymbolRecord::new(format!("AB{}", i), format!("Holding {}", i), "Holding", SymbolType::Nyse, "USD"))
            .collect();
        let catalog = SymbolCatalog::new(records);
        for query in ["a", "ab", "ab1", "holding", "hold1ng"] {
            assert!(search(&catalog, query).len() <= 20);
        }

        let matcher = SymbolMatcher::new(MatcherSettings {
            max_results: 5,
            ..MatcherSettings::default()
        });
        assert_eq!(matcher.search(&catalog, "ab").len(), 5);
    }

    #[test]
    fn test_exhausted_budget_skips_rest_of_catalog() {
        let records: Vec<SymbolRecord> = (0..1_000)
            .map(|i| SymbolRecord::new(format!("ZZ{}", i), "Filler", "Filler", SymbolType::Nyse, "USD"))
            .collect();
        let catalog = SymbolCatalog::new(records);
        let matcher = SymbolMatcher::new(MatcherSettings {
            time_budget_ms: 0,
            ..MatcherSettings::default()
        });
        // The first block is always scanned before the deadline is checked
        let results = matcher.search_scored(&catalog, "zz1");
        assert!(results.len() <= 20);
        assert_eq!(results[0].record.symbol, "ZZ1");
    }
}
