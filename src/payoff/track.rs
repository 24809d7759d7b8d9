//! Debt tracks (mortgage tranches)

use serde::{Deserialize, Serialize};

/// Kind of mortgage track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackKind {
    Prime,
    FixedLinked,
    FixedNonLinked,
    VariableLinked,
    VariableNonLinked,
    Foreign,
    Other,
}

impl TrackKind {
    /// Whether this kind is indexed to inflation by default
    pub fn is_linked(&self) -> bool {
        matches!(self, TrackKind::FixedLinked | TrackKind::VariableLinked)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrackKind::Prime => "prime",
            TrackKind::FixedLinked => "fixed-linked",
            TrackKind::FixedNonLinked => "fixed-non-linked",
            TrackKind::VariableLinked => "variable-linked",
            TrackKind::VariableNonLinked => "variable-non-linked",
            TrackKind::Foreign => "foreign",
            TrackKind::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "prime" => TrackKind::Prime,
            "fixed-linked" => TrackKind::FixedLinked,
            "fixed-non-linked" => TrackKind::FixedNonLinked,
            "variable-linked" => TrackKind::VariableLinked,
            "variable-non-linked" => TrackKind::VariableNonLinked,
            "foreign" => TrackKind::Foreign,
            "other" => TrackKind::Other,
            _ => return None,
        };
        Some(kind)
    }
}

/// One tranche of a mortgage or loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtTrack {
    /// Unique track identifier
    pub id: u32,

    pub kind: TrackKind,

    /// Outstanding balance
    pub balance: f64,

    /// Nominal annual rate in percent
    pub nominal_rate: f64,

    /// Remaining term in years
    pub term_years: f64,

    /// Whether the balance is indexed to inflation
    pub is_inflation_linked: bool,
}

impl DebtTrack {
    /// Create a track, deriving the linkage flag from its kind
    pub fn new(id: u32, kind: TrackKind, balance: f64, nominal_rate: f64, term_years: f64) -> Self {
        Self {
            id,
            kind,
            balance,
            nominal_rate,
            term_years,
            is_inflation_linked: kind.is_linked(),
        }
    }

    /// Override the linkage flag
    pub fn with_inflation_linked(mut self, linked: bool) -> Self {
        self.is_inflation_linked = linked;
        self
    }

    /// Change the kind; switching to a linked kind turns linkage on
    pub fn set_kind(&mut self, kind: TrackKind) {
        self.kind = kind;
        if kind.is_linked() {
            self.is_inflation_linked = true;
        }
    }

    /// Effective annual rate in percent, compounding inflation for linked tracks
    pub fn effective_rate(&self, inflation_percent: f64) -> f64 {
        if self.is_inflation_linked {
            ((1.0 + self.nominal_rate / 100.0) * (1.0 + inflation_percent / 100.0) - 1.0) * 100.0
        } else {
            self.nominal_rate
        }
    }
}
