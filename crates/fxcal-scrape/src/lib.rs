//! Calendar and quote scraping for fxcal.
//!
//! The calendar scraper is written once against the `PageDriver`
//! capability and runs over any backend:
//! - `WebDriverPage`: a real browser session over the WebDriver protocol
//! - `HtmlSnapshotDriver`: static HTML fetched over HTTP or loaded from a fixture
//! - `MockPageDriver`: a scripted in-memory page for tests
//!
//! Quote pages are plain HTTP GETs scraped with a CSS selector.

pub mod calendar;
pub mod driver;
pub mod error;
pub mod http;
pub mod mock;
pub mod quote;
pub mod snapshot;
pub mod webdriver;

pub use calendar::{
    open_driver, CalendarConfig, CalendarScrape, CalendarScraper, CalendarSelectors, DriverKind,
    RowError, SkippedRow,
};
pub use driver::{query_first, ElementHandle, LocalBoxFuture, PageDriver};
pub use error::{ScrapeError, ScrapeResult};
pub use http::{build_client, HttpConfig, DEFAULT_USER_AGENT};
pub use mock::{MockDriverLog, MockElement, MockPageDriver, MockRow};
pub use quote::{default_quote_sources, extract_quote, QuoteFetcher, QuoteSource};
pub use snapshot::HtmlSnapshotDriver;
pub use webdriver::WebDriverPage;
