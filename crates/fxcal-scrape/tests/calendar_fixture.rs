//! Calendar extraction against a saved calendar page.
//!
//! Runs the real scraper over `HtmlSnapshotDriver`, so selectors, date
//! carry-forward and row skipping are exercised on actual markup.

use fxcal_core::{divergent, high_impact, Impact};
use fxcal_scrape::{CalendarConfig, CalendarScraper, HtmlSnapshotDriver, RowError};

const CALENDAR_HTML: &str = include_str!("fixtures/calendar.html");

fn scraper() -> CalendarScraper {
    CalendarScraper::new(CalendarConfig {
        url: "https://calendar.test/calendar".to_string(),
        scroll_pause_ms: 0,
        ..Default::default()
    })
}

#[tokio::test]
async fn test_fixture_rows_extracted_in_page_order() {
    let mut driver = HtmlSnapshotDriver::from_html(CALENDAR_HTML);
    let scrape = scraper().fetch_events(&mut driver).await.unwrap();

    let titles: Vec<_> = scrape
        .events
        .iter()
        .map(|e| e.event_title.as_str())
        .collect();
    assert_eq!(
        titles,
        vec![
            "German Factory Orders m/m",
            "ISM Services PMI",
            "JOLTS Job Openings",
            "10-y Bond Auction",
            "Unemployment Claims",
            "Bank Holiday",
        ]
    );

    let impacts: Vec<_> = scrape.events.iter().map(|e| e.impact).collect();
    assert_eq!(
        impacts,
        vec![
            Impact::Low,
            Impact::High,
            Impact::High,
            Impact::Medium,
            Impact::High,
            Impact::None,
        ]
    );
}

#[tokio::test]
async fn test_fixture_dates_and_values() {
    let mut driver = HtmlSnapshotDriver::from_html(CALENDAR_HTML);
    let scrape = scraper().fetch_events(&mut driver).await.unwrap();
    let events = &scrape.events;

    assert_eq!(events[0].date, "Mon Jan 6");
    assert_eq!(events[1].date, "Mon Jan 6");
    assert_eq!(events[2].date, "Mon Jan 6");
    assert_eq!(events[3].date, "Tue Jan 7");
    assert_eq!(events[5].date, "Tue Jan 7");

    assert_eq!(events[0].currency, "EUR");
    assert_eq!(events[0].actual, "-5.4%");
    assert_eq!(events[0].forecast, "-1.5%");
    assert_eq!(events[0].previous, "4.1%");
    assert_eq!(events[4].actual, "");
    assert_eq!(events[4].forecast, "214K");
}

#[tokio::test]
async fn test_fixture_day_breakers_skipped() {
    let mut driver = HtmlSnapshotDriver::from_html(CALENDAR_HTML);
    let scrape = scraper().fetch_events(&mut driver).await.unwrap();

    let skipped: Vec<_> = scrape.skipped.iter().map(|s| s.index).collect();
    assert_eq!(skipped, vec![0, 4]);
    assert!(scrape
        .skipped
        .iter()
        .all(|s| matches!(s.reason, RowError::Missing { field: "currency", .. })));
    assert_eq!(scrape.rows_seen(), 8);
}

#[tokio::test]
async fn test_fixture_filters() {
    let mut driver = HtmlSnapshotDriver::from_html(CALENDAR_HTML);
    let scrape = scraper().fetch_events(&mut driver).await.unwrap();

    let high = high_impact(&scrape.events);
    assert_eq!(high.len(), 3);

    // JOLTS: 8.10M equals 8,100K; Claims has no actual yet.
    let diff = divergent(&high);
    assert_eq!(diff.len(), 1);
    assert_eq!(diff[0].event_title, "ISM Services PMI");
}
