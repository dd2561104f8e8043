//! Event filter stages.
//!
//! Both stages are stable: output order follows input order.

use crate::error::Result;
use crate::event::EventRecord;
use crate::number::clean_number;

/// Keep only high-impact records.
pub fn high_impact(records: &[EventRecord]) -> Vec<EventRecord> {
    records
        .iter()
        .filter(|r| r.impact.is_high())
        .cloned()
        .collect()
}

/// Compare actual against forecast for one record.
///
/// Returns `Ok(true)` when both values parse and differ. Equality is exact
/// `f64` comparison with no tolerance band.
///
/// # Errors
/// Returns `CoreError::UnparsableNumber` for the first of actual/forecast
/// that cannot be normalized (including empty cells).
pub fn compare(record: &EventRecord) -> Result<bool> {
    let actual = clean_number(&record.actual)?;
    let forecast = clean_number(&record.forecast)?;
    Ok(actual != forecast)
}

/// Keep records whose actual value differs from the forecast.
///
/// Records with an unparsable actual or forecast are excluded.
pub fn divergent(records: &[EventRecord]) -> Vec<EventRecord> {
    records
        .iter()
        .filter(|r| compare(r).unwrap_or(false))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::event::Impact;

    fn record(title: &str, impact: Impact, actual: &str, forecast: &str) -> EventRecord {
        EventRecord::new("Tue Jan 7", "USD", impact, title).with_values(actual, forecast, "")
    }

    #[test]
    fn test_high_impact_keeps_order() {
        let records = vec![
            record("A", Impact::High, "", ""),
            record("B", Impact::Low, "", ""),
            record("C", Impact::High, "", ""),
            record("D", Impact::None, "", ""),
            record("E", Impact::Medium, "", ""),
        ];
        let high = high_impact(&records);
        let titles: Vec<_> = high.iter().map(|r| r.event_title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C"]);
    }

    #[test]
    fn test_equal_values_excluded() {
        let records = vec![record("A", Impact::High, "100", "100")];
        assert!(divergent(&records).is_empty());
    }

    #[test]
    fn test_different_values_included() {
        let records = vec![record("A", Impact::High, "100", "95")];
        assert_eq!(divergent(&records).len(), 1);
    }

    #[test]
    fn test_empty_actual_excluded() {
        let records = vec![
            record("A", Impact::High, "", "95"),
            record("B", Impact::High, "", ""),
        ];
        assert!(divergent(&records).is_empty());
    }

    #[test]
    fn test_normalized_units_compare_equal() {
        // 250K and 250,000 are the same number once normalized.
        let records = vec![record("NFP", Impact::High, "250K", "250,000")];
        assert!(divergent(&records).is_empty());
    }

    #[test]
    fn test_divergent_keeps_order() {
        let records = vec![
            record("A", Impact::High, "0.3%", "0.2%"),
            record("B", Impact::High, "0.2%", "0.2%"),
            record("C", Impact::High, "n/a", "0.2%"),
            record("D", Impact::High, "180K", "200K"),
        ];
        let titles: Vec<_> = divergent(&records)
            .into_iter()
            .map(|r| r.event_title)
            .collect();
        assert_eq!(titles, vec!["A", "D"]);
    }

    #[test]
    fn test_compare_reports_unparsable_value() {
        let r = record("A", Impact::High, "100", "");
        assert_eq!(compare(&r), Err(CoreError::UnparsableNumber(String::new())));
        assert_eq!(compare(&record("B", Impact::High, "1", "2")), Ok(true));
    }
}
