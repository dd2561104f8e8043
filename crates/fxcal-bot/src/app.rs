//! Main application orchestration.
//!
//! One run is a single linear pass:
//! 1. Scrape the calendar (the driver is closed whatever the outcome)
//! 2. Keep high-impact events, then those whose actual differs from forecast
//! 3. Fetch market quotes
//! 4. Print the diagnostic tables to stdout
//! 5. Build the report and post it, unless this is a dry run
//!
//! A calendar load or row-wait failure aborts the run before any
//! notification is sent. Quote and row-level problems never do.

use fxcal_core::report::{event_table, indicator_table};
use fxcal_core::{build_report, compare, divergent, high_impact, EventRecord, Quote};
use fxcal_notify::WebhookNotifier;
use fxcal_scrape::{
    build_client, open_driver, CalendarScraper, HtmlSnapshotDriver, PageDriver, QuoteFetcher,
};
use fxcal_telemetry::RunSummary;
use reqwest::Client;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::AppResult;

const DIAG_DIVERGENT_HEADING: &str = "📢 近日高影响力经济事件实际值与预期值不同：";
const DIAG_HIGH_HEADING: &str = "📢 近日高影响力经济事件一览（仅 High）：";

/// Main application.
pub struct Application {
    config: AppConfig,
    client: Client,
    scraper: CalendarScraper,
    quotes: QuoteFetcher,
    /// `None` in dry-run mode.
    notifier: Option<WebhookNotifier>,
}

impl Application {
    /// Create the application from configuration.
    ///
    /// Resolves the webhook key up front, so a missing key fails before any
    /// network I/O. Dry runs need no key.
    pub fn new(config: AppConfig, dry_run: bool) -> AppResult<Self> {
        config.validate()?;

        let client = build_client(&config.http)?;

        let notifier = if dry_run {
            None
        } else {
            let key = config.notifier.send_key()?;
            Some(WebhookNotifier::new(client.clone(), &config.notifier, key)?)
        };

        Ok(Self {
            scraper: CalendarScraper::new(config.calendar.clone()),
            quotes: QuoteFetcher::new(client.clone()),
            client,
            notifier,
            config,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn is_dry_run(&self) -> bool {
        self.notifier.is_none()
    }

    /// Open the configured calendar driver.
    pub async fn open_driver(&self) -> AppResult<Box<dyn PageDriver>> {
        let driver = open_driver(
            &self.config.calendar,
            self.client.clone(),
            &self.config.http.user_agent,
        )
        .await?;
        Ok(driver)
    }

    /// Snapshot driver over a saved calendar page.
    ///
    /// # Errors
    /// Returns `AppError::Io` if the file cannot be read.
    pub fn snapshot_driver(path: &str) -> AppResult<Box<dyn PageDriver>> {
        let html = std::fs::read_to_string(path)?;
        info!(path = %path, bytes = html.len(), "Using calendar snapshot file");
        Ok(Box::new(HtmlSnapshotDriver::from_html(html)))
    }

    /// Run the pipeline once over `driver`.
    ///
    /// The driver is closed before this returns, on success and failure.
    pub async fn run(&self, driver: &mut dyn PageDriver) -> AppResult<RunSummary> {
        let run_id = Uuid::new_v4();
        let span = info_span!("run", run_id = %run_id);

        let result = self.run_once(driver).instrument(span.clone()).await;
        if let Err(e) = &result {
            span.in_scope(|| error!(error = %e, "Run failed, no notification sent"));
        }
        result
    }

    async fn run_once(&self, driver: &mut dyn PageDriver) -> AppResult<RunSummary> {
        info!(dry_run = self.is_dry_run(), driver = driver.name(), "Run started");
        let mut summary = RunSummary::start();

        let scrape = self.scraper.fetch_events(driver).await?;
        summary.rows_seen = scrape.rows_seen();
        summary.rows_skipped = scrape.skipped.len();
        summary.events = scrape.events.len();

        let high = high_impact(&scrape.events);
        log_unparsable(&high);
        let diff = divergent(&high);
        summary.high_impact = high.len();
        summary.divergent = diff.len();
        info!(high = high.len(), divergent = diff.len(), "Events filtered");

        let quotes = self.quotes.fetch_all(&self.config.quotes).await;
        summary.quotes_total = quotes.len();
        summary.quotes_available = quotes.iter().filter(|q| q.value.is_available()).count();

        println!("{}", diagnostics(&quotes, &high, &diff));

        let report = build_report(&quotes, &high, &diff);
        match &self.notifier {
            Some(notifier) => {
                summary.notification_sent = notifier.notify(&report.title, &report.body).await;
            }
            None => {
                info!(title = %report.title, "Dry run, notification not posted");
                println!("\n{}\n\n{}", report.title, report.body);
            }
        }

        summary.finish();
        summary.log();
        Ok(summary)
    }
}

/// Records excluded from the divergence check because a value did not parse.
fn log_unparsable(high: &[EventRecord]) {
    for record in high {
        if let Err(e) = compare(record) {
            debug!(
                event = %record.event_title,
                actual = %record.actual,
                forecast = %record.forecast,
                error = %e,
                "Excluded from divergence check"
            );
        }
    }
}

/// Plain-text tables printed after each run.
pub fn diagnostics(quotes: &[Quote], high: &[EventRecord], divergent: &[EventRecord]) -> String {
    format!(
        "{}\n\n{DIAG_DIVERGENT_HEADING}\n\n{}\n\n{DIAG_HIGH_HEADING}\n\n{}",
        indicator_table(quotes),
        event_table(divergent),
        event_table(high),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxcal_core::{Impact, QuoteValue};
    use fxcal_notify::NotifyError;
    use fxcal_scrape::{MockElement, MockPageDriver, MockRow, ScrapeError};

    use crate::error::AppError;

    fn dry_run_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.quotes.clear();
        config.calendar.url = "https://calendar.test/".to_string();
        config.calendar.scroll_pause_ms = 0;
        config
    }

    fn row(currency: &str, impact: &str, title: &str, actual: &str, forecast: &str) -> MockRow {
        let s = fxcal_scrape::CalendarSelectors::default();
        MockRow::new()
            .with(s.date, MockElement::text("Mon Jan 6"))
            .with(s.currency, MockElement::text(currency))
            .with(s.impact, MockElement::text("").with_attr("class", impact))
            .with(s.title, MockElement::text(title))
            .with(s.actual, MockElement::text(actual))
            .with(s.forecast, MockElement::text(forecast))
            .with(s.previous, MockElement::text("1.0"))
    }

    #[test]
    fn test_missing_key_fails_unless_dry_run() {
        let mut config = dry_run_config();
        config.notifier.key_env = "FXCAL_TEST_APP_KEY_UNSET".to_string();
        config.notifier.key = None;

        let err = Application::new(config.clone(), false).err();
        assert!(matches!(err, Some(AppError::Notify(NotifyError::MissingKey(_)))));

        let app = Application::new(config, true).unwrap();
        assert!(app.is_dry_run());
    }

    #[test]
    fn test_snapshot_driver_missing_file() {
        let err = Application::snapshot_driver("/nonexistent/calendar.html").err();
        assert!(matches!(err, Some(AppError::Io(_))));
    }

    #[tokio::test]
    async fn test_snapshot_driver_from_file() {
        let path = std::env::temp_dir().join(format!("fxcal-calendar-{}.html", std::process::id()));
        std::fs::write(&path, "<table><tr class=\"calendar__row\"></tr></table>").unwrap();

        let mut driver = Application::snapshot_driver(path.to_str().unwrap()).unwrap();
        assert_eq!(driver.name(), "snapshot");
        driver.load_page("file://calendar", std::time::Duration::from_secs(1)).await.unwrap();
        driver
            .wait_for_selector("tr.calendar__row", std::time::Duration::from_secs(1))
            .await
            .unwrap();

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_diagnostics_sections() {
        let quotes = vec![Quote::new("USD/JPY Rate", QuoteValue::Value("157.3".to_string()))];
        let high = vec![EventRecord::new("Mon Jan 6", "USD", Impact::High, "ISM")
            .with_values("54.1", "53.5", "52.1")];

        let text = diagnostics(&quotes, &high, &high);
        assert!(text.lines().next().unwrap().trim_start().starts_with("指标"));
        assert!(text.contains(DIAG_DIVERGENT_HEADING));
        assert!(text.contains(DIAG_HIGH_HEADING));
        assert_eq!(text.matches("ISM").count(), 2);
    }

    #[tokio::test]
    async fn test_dry_run_counts() {
        let app = Application::new(dry_run_config(), true).unwrap();
        let rows = vec![
            row("USD", "icon icon--ff-impact-red", "ISM", "54.1", "53.5"),
            row("USD", "icon icon--ff-impact-red", "Claims", "214K", "214K"),
            row("EUR", "icon icon--ff-impact-yel", "Orders", "1.0", "2.0"),
        ];
        let mut driver = MockPageDriver::new(app.config().calendar.selectors.row.clone(), rows);
        let log = driver.log();

        let summary = app.run(&mut driver).await.unwrap();

        assert_eq!(summary.events, 3);
        assert_eq!(summary.high_impact, 2);
        assert_eq!(summary.divergent, 1);
        assert_eq!(summary.quotes_total, 0);
        assert!(!summary.notification_sent);
        assert!(summary.finished_at.is_some());
        assert!(log.is_closed());
    }

    #[tokio::test]
    async fn test_row_wait_timeout_fails_run() {
        let app = Application::new(dry_run_config(), true).unwrap();
        let mut driver =
            MockPageDriver::new(app.config().calendar.selectors.row.clone(), vec![]).failing_wait();
        let log = driver.log();

        let err = app.run(&mut driver).await.unwrap_err();

        assert!(matches!(err, AppError::Scrape(ScrapeError::WaitTimeout { .. })));
        assert!(log.is_closed());
    }
}
