//! Economic calendar event records.
//!
//! Numeric columns are kept as the raw strings the calendar renders
//! (`3.1%`, `1,234`, `250K`). Conversion happens in the filter stage.

use serde::{Deserialize, Serialize};

/// Impact classification of a calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Impact {
    High,
    Medium,
    Low,
    #[default]
    None,
}

impl Impact {
    /// Classify an impact icon by its `class` attribute.
    ///
    /// The calendar marks impact with colour classes on the icon span.
    /// Matching is by substring and checked in severity order, so a class
    /// list carrying several colours resolves to the most severe one.
    pub fn from_class(class: &str) -> Self {
        if class.contains("impact-red") {
            Self::High
        } else if class.contains("impact-org") {
            Self::Medium
        } else if class.contains("impact-yel") {
            Self::Low
        } else {
            Self::None
        }
    }

    /// Check if this is a high-impact classification.
    pub fn is_high(&self) -> bool {
        matches!(self, Self::High)
    }
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
            Self::None => write!(f, "None"),
        }
    }
}

/// One row of the economic calendar.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventRecord {
    /// Display date, carried forward from the last row that declared one.
    pub date: String,
    /// Currency code (e.g., "USD").
    pub currency: String,
    pub impact: Impact,
    pub event_title: String,
    /// Released value, empty until published.
    pub actual: String,
    pub forecast: String,
    pub previous: String,
}

impl EventRecord {
    /// Create a record with empty value columns.
    pub fn new(
        date: impl Into<String>,
        currency: impl Into<String>,
        impact: Impact,
        event_title: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            currency: currency.into(),
            impact,
            event_title: event_title.into(),
            ..Default::default()
        }
    }

    /// Set actual/forecast/previous values.
    #[must_use]
    pub fn with_values(
        mut self,
        actual: impl Into<String>,
        forecast: impl Into<String>,
        previous: impl Into<String>,
    ) -> Self {
        self.actual = actual.into();
        self.forecast = forecast.into();
        self.previous = previous.into();
        self
    }
}
