//! Normalized search keys for catalog entries

use super::record::SymbolRecord;

/// Exchange suffixes stripped from tickers, e.g. `ESLT.TA`
const EXCHANGE_SUFFIXES: &[&str] = &[".ta", ".l", ".to", ".de", ".pa", ".as", ".hk", ".t", ".sw", ".mi"];

/// Quote currencies stripped from crypto pairs, e.g. `BTC-USD`
const QUOTE_SUFFIXES: &[&str] = &["-usd", "-usdt", "-eur", "-ils"];

/// Lowercase and trim a query or field
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Ticker with exchange prefix and suffix stripped, lowercased
pub fn base_symbol(symbol: &str) -> String {
    let mut base = normalize(symbol);

    if let Some(idx) = base.rfind(':') {
        base = base[idx + 1..].to_string();
    }

    if let Some(stripped) = base.strip_suffix("=x") {
        base = stripped.to_string();
    }

    for suffix in EXCHANGE_SUFFIXES.iter().chain(QUOTE_SUFFIXES) {
        if base.len() > suffix.len() && base.ends_with(suffix) {
            base.truncate(base.len() - suffix.len());
            break;
        }
    }

    base
}

/// Exchange-local numeric identifier, from the base symbol or the display form
pub fn numeric_id(base: &str, display: Option<&str>) -> Option<String> {
    if is_numeric(base) {
        return Some(base.to_string());
    }

    let display = display?.trim();
    let digits: String = display.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.len() >= 3 {
        Some(digits)
    } else {
        None
    }
}

pub fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Precomputed lowercase keys for one record
#[derive(Debug, Clone)]
pub struct SearchKeys {
    pub symbol: String,
    pub base: String,
    pub display: Option<String>,
    pub numeric_id: Option<String>,
    pub name: String,
    pub short_name: String,
    pub name_words: Vec<String>,
    pub terms: Vec<String>,
}

impl SearchKeys {
    pub fn from_record(record: &SymbolRecord) -> Self {
        let base = base_symbol(&record.symbol);
        let display = record
            .display_symbol
            .as_deref()
            .map(normalize)
            .filter(|d| !d.is_empty());
        let numeric_id = numeric_id(&base, display.as_deref());
        let name = normalize(&record.name);
        let name_words = name
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            symbol: normalize(&record.symbol),
            base,
            display,
            numeric_id,
            name,
            short_name: normalize(&record.short_name),
            name_words,
            terms: record
                .search_terms
                .iter()
                .map(|t| normalize(t))
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// Key identifying the same security across its listed variants
    pub fn entity_key(&self) -> (String, String) {
        let id = self.numeric_id.clone().unwrap_or_else(|| self.base.clone());
        (id, self.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::record::SymbolType;

    #[test]
    fn test_base_symbol_strips_prefix_and_suffix() {
        assert_eq!(base_symbol("NASDAQ:AAPL"), "aapl");
        assert_eq!(base_symbol("ESLT.TA"), "eslt");
        assert_eq!(base_symbol("BTC-USD"), "btc");
        assert_eq!(base_symbol("USDILS=X"), "usdils");
        assert_eq!(base_symbol(" brk.b "), "brk.b");
    }

    #[test]
    fn test_numeric_id_sources() {
        assert_eq!(numeric_id("1081124", None).as_deref(), Some("1081124"));
        assert_eq!(numeric_id("eslt", Some("1081124 Elbit")).as_deref(), Some("1081124"));
        assert_eq!(numeric_id("eslt", Some("Elbit")), None);
        assert_eq!(numeric_id("eslt", None), None);
    }

    #[test]
    fn test_keys_share_entity_across_variants() {
        let bare = SymbolRecord::new("1081124", "Elbit Systems", "ELBIT", SymbolType::Tase, "ILS");
        let merged = bare.clone().with_display_symbol("1081124 Elbit Systems");
        assert_eq!(
            SearchKeys::from_record(&bare).entity_key(),
            SearchKeys::from_record(&merged).entity_key()
        );
        assert_eq!(SearchKeys::from_record(&merged).name_words, vec!["elbit", "systems"]);
    }
}
