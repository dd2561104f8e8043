//! Market quote scraping.
//!
//! Each quote page is fetched with one GET and read from a single element.
//! Every failure is folded into `QuoteValue::Unavailable` so a missing quote
//! never fails the run.

use fxcal_core::{Quote, QuoteValue};
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ScrapeError, ScrapeResult};

/// A quote page and where its value sits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteSource {
    /// Label shown in the indicator table.
    pub label: String,
    pub url: String,
    /// CSS selector of the element holding the value.
    pub selector: String,
    /// Name used in error messages; defaults to `label`.
    #[serde(default)]
    pub name: Option<String>,
}

impl QuoteSource {
    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.label)
    }

    fn not_found(&self) -> QuoteValue {
        QuoteValue::Unavailable(format!("{} not found.", self.name()))
    }

    fn fetch_failed(&self, reason: impl std::fmt::Display) -> QuoteValue {
        QuoteValue::Unavailable(format!("Error fetching {}: {reason}", self.name()))
    }
}

/// USD/JPY spot and the US 10-year yield.
pub fn default_quote_sources() -> Vec<QuoteSource> {
    vec![
        QuoteSource {
            label: "USD/JPY Rate".to_string(),
            url: "https://es.investing.com/currencies/usd-jpy".to_string(),
            selector: r#"div[data-test="instrument-price-last"]"#.to_string(),
            name: Some("USD/JPY rate".to_string()),
        },
        QuoteSource {
            label: "US 10Y Yield".to_string(),
            url: "https://www.cnbc.com/quotes/US10Y".to_string(),
            selector: "span.QuoteStrip-lastPrice".to_string(),
            name: Some("US10Y yield".to_string()),
        },
    ]
}

/// Text of the first element matching `selector` in `html`.
///
/// # Errors
/// Returns `ScrapeError::InvalidSelector` if `selector` does not parse.
pub fn extract_quote(html: &str, selector: &str) -> ScrapeResult<Option<String>> {
    let selector = Selector::parse(selector)
        .map_err(|e| ScrapeError::InvalidSelector(format!("{selector}: {e:?}")))?;
    let document = Html::parse_document(html);
    Ok(document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string()))
}

/// Fetches quote pages over HTTP.
pub struct QuoteFetcher {
    client: Client,
}

impl QuoteFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetch one quote. Never fails; problems become `Unavailable`.
    pub async fn fetch_quote(&self, source: &QuoteSource) -> Quote {
        let value = self.fetch_value(source).await;
        match &value {
            QuoteValue::Value(v) => debug!(label = %source.label, value = %v, "Quote fetched"),
            QuoteValue::Unavailable(reason) => {
                warn!(label = %source.label, url = %source.url, reason = %reason, "Quote unavailable")
            }
        }
        Quote::new(source.label.clone(), value)
    }

    /// Fetch all quotes in order, one request at a time.
    pub async fn fetch_all(&self, sources: &[QuoteSource]) -> Vec<Quote> {
        let mut quotes = Vec::with_capacity(sources.len());
        for source in sources {
            quotes.push(self.fetch_quote(source).await);
        }
        quotes
    }

    async fn fetch_value(&self, source: &QuoteSource) -> QuoteValue {
        let response = match self.client.get(&source.url).send().await {
            Ok(r) => r,
            Err(e) => return source.fetch_failed(e),
        };

        let status = response.status();
        if status != StatusCode::OK {
            return source.fetch_failed(status.as_u16());
        }

        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => return source.fetch_failed(e),
        };

        match extract_quote(&body, &source.selector) {
            Ok(Some(text)) => QuoteValue::Value(text),
            Ok(None) => source.not_found(),
            Err(e) => source.fetch_failed(e),
        }
    }
}
