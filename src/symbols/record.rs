//! Catalog entries for tradable symbols

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Market or asset class a symbol belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolType {
    Nyse,
    Nasdaq,
    Amex,
    /// Tel Aviv Stock Exchange; securities also carry a numeric id
    Tase,
    Etf,
    Index,
    Currency,
    Crypto,
    Other,
}

impl SymbolType {
    pub fn parse(s: &str) -> Result<Self> {
        let symbol_type = match s.trim().to_ascii_lowercase().as_str() {
            "nyse" => SymbolType::Nyse,
            "nasdaq" => SymbolType::Nasdaq,
            "amex" => SymbolType::Amex,
            "tase" => SymbolType::Tase,
            "etf" => SymbolType::Etf,
            "index" => SymbolType::Index,
            "currency" => SymbolType::Currency,
            "crypto" => SymbolType::Crypto,
            "other" => SymbolType::Other,
            other => return Err(Error::UnknownSymbolType(other.to_string())),
        };
        Ok(symbol_type)
    }
}

/// Read-only catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolRecord {
    /// Ticker as quoted, possibly with exchange prefix or suffix
    pub symbol: String,

    pub name: String,

    pub short_name: String,

    pub symbol_type: SymbolType,

    /// Quote currency
    pub currency: String,

    /// Merged human-readable form, e.g. numeric id plus company name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_symbol: Option<String>,

    /// Extra terms the symbol should be found by
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_terms: Vec<String>,
}

impl SymbolRecord {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        short_name: impl Into<String>,
        symbol_type: SymbolType,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            short_name: short_name.into(),
            symbol_type,
            currency: currency.into(),
            display_symbol: None,
            search_terms: Vec::new(),
        }
    }

    pub fn with_display_symbol(mut self, display: impl Into<String>) -> Self {
        self.display_symbol = Some(display.into());
        self
    }

    pub fn with_search_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_terms = terms.into_iter().map(Into::into).collect();
        self
    }

    /// Whether this entry carries a merged display form
    pub fn is_merged(&self) -> bool {
        self.display_symbol.as_deref().is_some_and(|d| !d.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_symbol_type() {
        assert_eq!(SymbolType::parse("TASE").unwrap(), SymbolType::Tase);
        assert!(matches!(SymbolType::parse("otc"), Err(Error::UnknownSymbolType(_))));
    }

    #[test]
    fn test_json_uses_camel_case_fields() {
        let json = r#"{
            "symbol": "1081124",
            "name": "Elbit Systems",
            "shortName": "ELBIT",
            "symbolType": "tase",
            "currency": "ILS",
            "displaySymbol": "1081124 Elbit Systems"
        }"#;
        let record: SymbolRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.short_name, "ELBIT");
        assert!(record.is_merged());
        assert!(record.search_terms.is_empty());
    }
}
