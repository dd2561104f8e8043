//! Per-run summary record.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// Counts collected over one run, logged once at the end.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Calendar rows visited, including skipped ones.
    pub rows_seen: usize,
    pub rows_skipped: usize,
    pub events: usize,
    pub high_impact: usize,
    pub divergent: usize,
    pub quotes_available: usize,
    pub quotes_total: usize,
    pub notification_sent: bool,
}

impl RunSummary {
    /// Start a summary stamped with the current time.
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            rows_seen: 0,
            rows_skipped: 0,
            events: 0,
            high_impact: 0,
            divergent: 0,
            quotes_available: 0,
            quotes_total: 0,
            notification_sent: false,
        }
    }

    /// Stamp the end time.
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Wall time in milliseconds, zero until finished.
    pub fn duration_ms(&self) -> i64 {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds())
            .unwrap_or(0)
    }

    pub fn log(&self) {
        info!(
            started_at = %self.started_at.to_rfc3339(),
            duration_ms = self.duration_ms(),
            rows_seen = self.rows_seen,
            rows_skipped = self.rows_skipped,
            events = self.events,
            high_impact = self.high_impact,
            divergent = self.divergent,
            quotes_available = self.quotes_available,
            quotes_total = self.quotes_total,
            notification_sent = self.notification_sent,
            "Run summary"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_zero_until_finished() {
        let mut summary = RunSummary::start();
        assert_eq!(summary.duration_ms(), 0);
        summary.finish();
        assert!(summary.finished_at.is_some());
        assert!(summary.duration_ms() >= 0);
    }

    #[test]
    fn test_serializes_counts() {
        let mut summary = RunSummary::start();
        summary.events = 6;
        summary.high_impact = 3;
        summary.notification_sent = true;

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["events"], 6);
        assert_eq!(json["high_impact"], 3);
        assert_eq!(json["notification_sent"], true);
        assert!(json["finished_at"].is_null());
    }
}
