//! Economic calendar scraping.
//!
//! Extraction runs row by row over a `PageDriver`:
//! - the date cell is only filled on the first row of each day, so the last
//!   non-empty date is carried forward to the rows below it
//! - currency, impact icon and title are required; a row missing any of
//!   them is skipped whole and reported as a `SkippedRow`
//! - actual/forecast/previous are optional and default to ""

use std::time::Duration;

use fxcal_core::{EventRecord, Impact};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::driver::{query_first, ElementHandle, PageDriver};
use crate::error::{ScrapeError, ScrapeResult};
use crate::snapshot::HtmlSnapshotDriver;
use crate::webdriver::WebDriverPage;

/// Calendar page driver backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    /// Real browser over WebDriver; renders scripts.
    #[default]
    WebDriver,
    /// Static HTML over plain HTTP.
    Snapshot,
}

impl std::str::FromStr for DriverKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "webdriver" => Ok(Self::WebDriver),
            "snapshot" => Ok(Self::Snapshot),
            other => Err(format!("unknown driver {other:?} (expected webdriver or snapshot)")),
        }
    }
}

/// CSS selectors for the calendar table.
///
/// Row-level selectors are evaluated inside each row element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSelectors {
    pub row: String,
    pub date: String,
    pub currency: String,
    /// Impact icon; its `class` attribute carries the colour.
    pub impact: String,
    pub title: String,
    pub actual: String,
    pub forecast: String,
    pub previous: String,
}

impl Default for CalendarSelectors {
    fn default() -> Self {
        Self {
            row: "tr.calendar__row".to_string(),
            date: "td.calendar__cell.calendar__date".to_string(),
            currency: "td.calendar__cell.calendar__currency".to_string(),
            impact: "td.calendar__cell.calendar__impact span".to_string(),
            title: "span.calendar__event-title".to_string(),
            actual: "td.calendar__cell.calendar__actual".to_string(),
            forecast: "td.calendar__cell.calendar__forecast".to_string(),
            previous: "td.calendar__cell.calendar__previous".to_string(),
        }
    }
}

/// Calendar scraping configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Calendar page URL.
    #[serde(default = "default_url")]
    pub url: String,
    /// Page driver backend.
    #[serde(default)]
    pub driver: DriverKind,
    /// WebDriver endpoint (chromedriver default port).
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
    /// Run the browser headless.
    #[serde(default = "default_true")]
    pub headless: bool,
    /// Navigation timeout (ms). Default: 60,000.
    #[serde(default = "default_page_load_timeout_ms")]
    pub page_load_timeout_ms: u64,
    /// Timeout for the first row to appear (ms). Default: 20,000.
    #[serde(default = "default_row_wait_timeout_ms")]
    pub row_wait_timeout_ms: u64,
    /// Scroll every row into view before extraction.
    #[serde(default = "default_true")]
    pub scroll_rows: bool,
    /// Pause after each scroll (ms). Default: 100.
    #[serde(default = "default_scroll_pause_ms")]
    pub scroll_pause_ms: u64,
    #[serde(default)]
    pub selectors: CalendarSelectors,
}

fn default_url() -> String {
    "https://www.forexfactory.com/calendar".to_string()
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_true() -> bool {
    true
}

fn default_page_load_timeout_ms() -> u64 {
    60_000
}

fn default_row_wait_timeout_ms() -> u64 {
    20_000
}

fn default_scroll_pause_ms() -> u64 {
    100
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            driver: DriverKind::default(),
            webdriver_url: default_webdriver_url(),
            headless: true,
            page_load_timeout_ms: default_page_load_timeout_ms(),
            row_wait_timeout_ms: default_row_wait_timeout_ms(),
            scroll_rows: true,
            scroll_pause_ms: default_scroll_pause_ms(),
            selectors: CalendarSelectors::default(),
        }
    }
}

/// Why a row produced no record.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("missing {field} ({selector})")]
    Missing {
        field: &'static str,
        selector: String,
    },

    #[error("impact icon has no class attribute")]
    MissingImpactClass,

    #[error("reading {field}: {source}")]
    Driver {
        field: &'static str,
        #[source]
        source: ScrapeError,
    },
}

/// A row dropped by the row-level fault policy.
#[derive(Debug)]
pub struct SkippedRow {
    /// Zero-based position among the matched rows.
    pub index: usize,
    pub reason: RowError,
}

/// Result of one calendar scrape.
#[derive(Debug, Default)]
pub struct CalendarScrape {
    /// Extracted records in page order.
    pub events: Vec<EventRecord>,
    pub skipped: Vec<SkippedRow>,
}

impl CalendarScrape {
    /// Total rows seen (extracted plus skipped).
    pub fn rows_seen(&self) -> usize {
        self.events.len() + self.skipped.len()
    }
}

/// Open the driver selected by `config`.
///
/// `client` and `user_agent` are used by the snapshot and WebDriver
/// backends respectively.
pub async fn open_driver(
    config: &CalendarConfig,
    client: Client,
    user_agent: &str,
) -> ScrapeResult<Box<dyn PageDriver>> {
    match config.driver {
        DriverKind::WebDriver => {
            let page = WebDriverPage::connect(
                &config.webdriver_url,
                user_agent,
                config.headless,
                Duration::from_millis(config.page_load_timeout_ms),
            )
            .await?;
            Ok(Box::new(page))
        }
        DriverKind::Snapshot => Ok(Box::new(HtmlSnapshotDriver::new(client))),
    }
}

/// Scrapes the calendar table into event records.
pub struct CalendarScraper {
    config: CalendarConfig,
}

impl CalendarScraper {
    pub fn new(config: CalendarConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CalendarConfig {
        &self.config
    }

    /// Scrape the calendar, then close the driver.
    ///
    /// The driver is closed on every path, including load and wait
    /// failures. A close failure is logged and does not mask the scrape
    /// result.
    ///
    /// # Errors
    /// Page load failures and `ScrapeError::WaitTimeout` when no row
    /// appears in time. Row-level problems never fail the scrape.
    pub async fn fetch_events(&self, driver: &mut dyn PageDriver) -> ScrapeResult<CalendarScrape> {
        let result = self.scrape(driver).await;
        if let Err(e) = driver.close().await {
            warn!(driver = driver.name(), error = %e, "Failed to close page driver");
        }
        result
    }

    async fn scrape(&self, driver: &mut dyn PageDriver) -> ScrapeResult<CalendarScrape> {
        let selectors = &self.config.selectors;

        info!(url = %self.config.url, driver = driver.name(), "Loading calendar page");
        driver
            .load_page(
                &self.config.url,
                Duration::from_millis(self.config.page_load_timeout_ms),
            )
            .await?;
        driver
            .wait_for_selector(
                &selectors.row,
                Duration::from_millis(self.config.row_wait_timeout_ms),
            )
            .await?;

        if self.config.scroll_rows {
            self.scroll_rows(driver).await?;
        }

        // Re-query: lazy rendering may have replaced the rows while scrolling.
        let rows = driver.query_all(None, &selectors.row).await?;
        debug!(rows = rows.len(), "Extracting calendar rows");

        let mut scrape = CalendarScrape::default();
        let mut current_date = String::new();
        for (index, row) in rows.into_iter().enumerate() {
            match self.extract_row(driver, row, &mut current_date).await {
                Ok(record) => scrape.events.push(record),
                Err(reason) => {
                    debug!(index, reason = %reason, "Skipping calendar row");
                    scrape.skipped.push(SkippedRow { index, reason });
                }
            }
        }

        info!(
            events = scrape.events.len(),
            skipped = scrape.skipped.len(),
            "Calendar scraped"
        );
        Ok(scrape)
    }

    async fn scroll_rows(&self, driver: &mut dyn PageDriver) -> ScrapeResult<()> {
        let rows = driver.query_all(None, &self.config.selectors.row).await?;
        let pause = Duration::from_millis(self.config.scroll_pause_ms);
        for row in rows {
            if let Err(e) = driver.scroll_into_view(row).await {
                debug!(error = %e, "Scroll into view failed");
                continue;
            }
            if !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
        }
        Ok(())
    }

    /// Extract one row. `current_date` is updated as soon as the row's date
    /// cell is read, even if a later field fails.
    async fn extract_row(
        &self,
        driver: &mut dyn PageDriver,
        row: ElementHandle,
        current_date: &mut String,
    ) -> Result<EventRecord, RowError> {
        let s = &self.config.selectors;

        if let Some(cell) = find(driver, row, "date", &s.date).await? {
            let date = read(driver, cell, "date").await?;
            if !date.is_empty() {
                *current_date = date;
            }
        }

        let currency = required_text(driver, row, "currency", &s.currency).await?;

        let icon = find(driver, row, "impact", &s.impact)
            .await?
            .ok_or_else(|| missing("impact", &s.impact))?;
        let class = driver
            .read_attribute(icon, "class")
            .await
            .map_err(|source| RowError::Driver {
                field: "impact",
                source,
            })?
            .ok_or(RowError::MissingImpactClass)?;
        let impact = Impact::from_class(&class);

        let event_title = required_text(driver, row, "title", &s.title).await?;

        let actual = optional_text(driver, row, &s.actual).await;
        let forecast = optional_text(driver, row, &s.forecast).await;
        let previous = optional_text(driver, row, &s.previous).await;

        Ok(EventRecord {
            date: current_date.clone(),
            currency,
            impact,
            event_title,
            actual,
            forecast,
            previous,
        })
    }
}

fn missing(field: &'static str, selector: &str) -> RowError {
    RowError::Missing {
        field,
        selector: selector.to_string(),
    }
}

async fn find(
    driver: &mut dyn PageDriver,
    row: ElementHandle,
    field: &'static str,
    selector: &str,
) -> Result<Option<ElementHandle>, RowError> {
    query_first(driver, Some(row), selector)
        .await
        .map_err(|source| RowError::Driver { field, source })
}

async fn read(
    driver: &mut dyn PageDriver,
    element: ElementHandle,
    field: &'static str,
) -> Result<String, RowError> {
    driver
        .read_text(element)
        .await
        .map(|t| t.trim().to_string())
        .map_err(|source| RowError::Driver { field, source })
}

async fn required_text(
    driver: &mut dyn PageDriver,
    row: ElementHandle,
    field: &'static str,
    selector: &str,
) -> Result<String, RowError> {
    let element = find(driver, row, field, selector)
        .await?
        .ok_or_else(|| missing(field, selector))?;
    read(driver, element, field).await
}

/// Text of an optional cell; any failure reads as "".
async fn optional_text(driver: &mut dyn PageDriver, row: ElementHandle, selector: &str) -> String {
    match query_first(driver, Some(row), selector).await {
        Ok(Some(element)) => driver
            .read_text(element)
            .await
            .map(|t| t.trim().to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}
