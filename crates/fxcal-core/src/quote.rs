//! Market indicator readings.

use serde::{Deserialize, Serialize};

/// A scraped quote, or the reason it is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "lowercase")]
pub enum QuoteValue {
    /// Raw displayed value (e.g., "157.32", "4.215%").
    Value(String),
    /// Descriptive message shown in place of the value.
    Unavailable(String),
}

impl QuoteValue {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Text shown in the report, whichever variant this is.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Value(s) | Self::Unavailable(s) => s,
        }
    }
}

impl std::fmt::Display for QuoteValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labelled indicator reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Indicator label (e.g., "USD/JPY Rate").
    pub label: String,
    pub value: QuoteValue,
}

impl Quote {
    pub fn new(label: impl Into<String>, value: QuoteValue) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}
