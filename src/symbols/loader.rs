//! Symbol catalog and its CSV/JSON loaders
//!
//! The catalog is loaded once per session and only read afterwards.

use std::io::Read;
use std::path::Path;

use csv::Reader;

use crate::error::{Error, Result};
use super::normalize::SearchKeys;
use super::record::{SymbolRecord, SymbolType};

/// A catalog entry together with its precomputed search keys
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub record: SymbolRecord,
    pub keys: SearchKeys,
}

/// Read-only snapshot of tradable symbols
#[derive(Debug, Clone, Default)]
pub struct SymbolCatalog {
    entries: Vec<CatalogEntry>,
}

impl SymbolCatalog {
    pub fn new(records: Vec<SymbolRecord>) -> Self {
        let entries = records
            .into_iter()
            .map(|record| CatalogEntry {
                keys: SearchKeys::from_record(&record),
                record,
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn records(&self) -> impl Iterator<Item = &SymbolRecord> {
        self.entries.iter().map(|e| &e.record)
    }

    /// Load from a `.csv` or `.json` file
    pub fn load(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let records = match extension.as_str() {
            "csv" => load_records_csv(std::fs::File::open(path)?)?,
            "json" => load_records_json(std::fs::File::open(path)?)?,
            other => return Err(Error::UnsupportedFormat(other.to_string())),
        };

        log::info!("Loaded {} symbols from {}", records.len(), path.display());
        Ok(Self::new(records))
    }
}

/// Raw CSV row; search terms are `|`-separated
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    symbol: String,
    name: String,
    #[serde(rename = "shortName")]
    short_name: String,
    #[serde(rename = "symbolType")]
    symbol_type: String,
    currency: String,
    #[serde(rename = "displaySymbol", default)]
    display_symbol: Option<String>,
    #[serde(rename = "searchTerms", default)]
    search_terms: Option<String>,
}

impl CsvRow {
    fn to_record(self) -> Result<SymbolRecord> {
        let symbol_type = SymbolType::parse(&self.symbol_type)?;

        let search_terms = self
            .search_terms
            .map(|terms| {
                terms
                    .split('|')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(SymbolRecord {
            symbol: self.symbol,
            name: self.name,
            short_name: self.short_name,
            symbol_type,
            currency: self.currency,
            display_symbol: self.display_symbol.filter(|d| !d.trim().is_empty()),
            search_terms,
        })
    }
}

/// Load records from any CSV reader
pub fn load_records_csv<R: Read>(reader: R) -> Result<Vec<SymbolRecord>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut records = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        records.push(row.to_record()?);
    }

    Ok(records)
}

/// Load records from a JSON array
pub fn load_records_json<R: Read>(reader: R) -> Result<Vec<SymbolRecord>> {
    let records: Vec<SymbolRecord> = serde_json::from_reader(std::io::BufReader::new(reader))?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
symbol,name,shortName,symbolType,currency,displaySymbol,searchTerms
AAPL,Apple Inc.,Apple,nasdaq,USD,,iphone|mac
1081124,Elbit Systems,ELBIT,tase,ILS,1081124 Elbit Systems,
BTC-USD,Bitcoin,Bitcoin,crypto,USD,,
";

    #[test]
    fn test_load_csv() {
        let records = load_records_csv(CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].search_terms, vec!["iphone", "mac"]);
        assert_eq!(records[0].display_symbol, None);
        assert_eq!(records[1].display_symbol.as_deref(), Some("1081124 Elbit Systems"));
        assert!(records[1].search_terms.is_empty());
        assert_eq!(records[2].symbol_type, SymbolType::Crypto);

        let catalog = SymbolCatalog::new(records);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.entries()[2].keys.base, "btc");
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let csv = "symbol,name,shortName,symbolType,currency\nXYZ,Xyz,Xyz,otc,USD\n";
        assert!(matches!(load_records_csv(csv.as_bytes()), Err(Error::UnknownSymbolType(_))));
    }

    #[test]
    fn test_load_json() {
        let json = r#"[{"symbol":"MSFT","name":"Microsoft","shortName":"Microsoft","symbolType":"nasdaq","currency":"USD"}]"#;
        let records = load_records_json(json.as_bytes()).unwrap();
        assert_eq!(records[0].symbol, "MSFT");
    }

    #[test]
    fn test_unsupported_extension() {
        let result = SymbolCatalog::load(Path::new("symbols.xml"));
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }
}
