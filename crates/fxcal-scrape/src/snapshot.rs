//! Page driver over a static HTML snapshot.
//!
//! No scripts run, so this only sees what the server renders. It backs the
//! offline mode (`--calendar-html`) and the fixture tests, and works against
//! any calendar mirror that serves the table pre-rendered.

use std::time::Duration;

use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::driver::{normalize_text, ElementHandle, LocalBoxFuture, PageDriver};
use crate::error::{ScrapeError, ScrapeResult};

/// Where the document comes from.
enum Source {
    /// GET the URL passed to `load_page`.
    Http(Client),
    /// A fixed document; `load_page` only resets handles.
    Fixed(String),
}

/// Page driver backed by `scraper`.
///
/// Element handles are ordinals of elements in document order, which stay
/// valid for as long as the parsed document is unchanged.
pub struct HtmlSnapshotDriver {
    source: Source,
    document: Option<Html>,
}

impl HtmlSnapshotDriver {
    /// Fetch pages over HTTP with `client`.
    pub fn new(client: Client) -> Self {
        Self {
            source: Source::Http(client),
            document: None,
        }
    }

    /// Serve `html` for every `load_page`.
    pub fn from_html(html: impl Into<String>) -> Self {
        Self {
            source: Source::Fixed(html.into()),
            document: None,
        }
    }

    fn document(&self) -> ScrapeResult<&Html> {
        self.document.as_ref().ok_or(ScrapeError::NoPage)
    }

    fn resolve(&self, handle: ElementHandle) -> ScrapeResult<ElementRef<'_>> {
        elements(self.document()?)
            .nth(handle.id())
            .ok_or(ScrapeError::UnknownElement(handle.id()))
    }

    fn do_query_all(
        &self,
        scope: Option<ElementHandle>,
        selector: &str,
    ) -> ScrapeResult<Vec<ElementHandle>> {
        let selector = parse_selector(selector)?;
        let scope = scope.map(|h| self.resolve(h)).transpose()?;
        Ok(elements(self.document()?)
            .enumerate()
            .filter(|(_, el)| selector.matches(el))
            .filter(|(_, el)| match &scope {
                Some(s) => el.ancestors().any(|a| a.id() == s.id()),
                None => true,
            })
            .map(|(i, _)| ElementHandle::new(i))
            .collect())
    }
}

fn elements(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
}

fn parse_selector(selector: &str) -> ScrapeResult<Selector> {
    Selector::parse(selector)
        .map_err(|e| ScrapeError::InvalidSelector(format!("{selector}: {e:?}")))
}

impl PageDriver for HtmlSnapshotDriver {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    fn load_page<'a>(
        &'a mut self,
        url: &'a str,
        timeout: Duration,
    ) -> LocalBoxFuture<'a, ScrapeResult<()>> {
        Box::pin(async move {
            let body = match &self.source {
                Source::Fixed(html) => {
                    debug!(url = %url, "Serving fixed HTML snapshot");
                    html.clone()
                }
                Source::Http(client) => {
                    let response = client
                        .get(url)
                        .timeout(timeout)
                        .send()
                        .await
                        .map_err(|e| ScrapeError::PageLoad(format!("{url}: {e}")))?;
                    let status = response.status();
                    if !status.is_success() {
                        return Err(ScrapeError::PageLoad(format!("{url}: HTTP {status}")));
                    }
                    response
                        .text()
                        .await
                        .map_err(|e| ScrapeError::PageLoad(format!("{url}: {e}")))?
                }
            };
            debug!(url = %url, bytes = body.len(), "Parsed HTML snapshot");
            self.document = Some(Html::parse_document(&body));
            Ok(())
        })
    }

    fn wait_for_selector<'a>(
        &'a mut self,
        selector: &'a str,
        timeout: Duration,
    ) -> LocalBoxFuture<'a, ScrapeResult<()>> {
        // A static document never changes, so one check decides the wait.
        let result = self.do_query_all(None, selector).and_then(|found| {
            if found.is_empty() {
                Err(ScrapeError::WaitTimeout {
                    selector: selector.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                })
            } else {
                Ok(())
            }
        });
        Box::pin(std::future::ready(result))
    }

    fn query_all<'a>(
        &'a mut self,
        scope: Option<ElementHandle>,
        selector: &'a str,
    ) -> LocalBoxFuture<'a, ScrapeResult<Vec<ElementHandle>>> {
        Box::pin(std::future::ready(self.do_query_all(scope, selector)))
    }

    fn scroll_into_view(&mut self, element: ElementHandle) -> LocalBoxFuture<'_, ScrapeResult<()>> {
        Box::pin(std::future::ready(self.resolve(element).map(|_| ())))
    }

    fn read_text(&mut self, element: ElementHandle) -> LocalBoxFuture<'_, ScrapeResult<String>> {
        let result = self
            .resolve(element)
            .map(|el| normalize_text(&el.text().collect::<String>()));
        Box::pin(std::future::ready(result))
    }

    fn read_attribute<'a>(
        &'a mut self,
        element: ElementHandle,
        name: &'a str,
    ) -> LocalBoxFuture<'a, ScrapeResult<Option<String>>> {
        let result = self
            .resolve(element)
            .map(|el| el.value().attr(name).map(str::to_string));
        Box::pin(std::future::ready(result))
    }

    fn close(&mut self) -> LocalBoxFuture<'_, ScrapeResult<()>> {
        self.document = None;
        Box::pin(std::future::ready(Ok(())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <table>
            <tr class="row"><td class="name">  first
              cell </td><td class="v" data-x="1">10</td></tr>
            <tr class="row"><td class="name">second</td></tr>
          </table>
          <td class="name">outside</td>
        </body></html>
    "#;

    async fn loaded() -> HtmlSnapshotDriver {
        let mut d = HtmlSnapshotDriver::from_html(PAGE);
        d.load_page("file://fixture", Duration::from_secs(1))
            .await
            .unwrap();
        d
    }

    #[tokio::test]
    async fn test_requires_load() {
        let mut d = HtmlSnapshotDriver::from_html(PAGE);
        assert!(matches!(
            d.query_all(None, "tr").await,
            Err(ScrapeError::NoPage)
        ));
    }

    #[tokio::test]
    async fn test_scoped_query() {
        let mut d = loaded().await;
        let rows = d.query_all(None, "tr.row").await.unwrap();
        assert_eq!(rows.len(), 2);

        let names = d.query_all(Some(rows[1]), "td.name").await.unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(d.read_text(names[0]).await.unwrap(), "second");

        assert!(d.query_all(Some(rows[1]), "td.v").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_text_and_attribute() {
        let mut d = loaded().await;
        let rows = d.query_all(None, "tr.row").await.unwrap();
        let name = d.query_all(Some(rows[0]), "td.name").await.unwrap()[0];
        assert_eq!(d.read_text(name).await.unwrap(), "first cell");

        let v = d.query_all(Some(rows[0]), "td.v").await.unwrap()[0];
        assert_eq!(
            d.read_attribute(v, "data-x").await.unwrap(),
            Some("1".to_string())
        );
        assert_eq!(d.read_attribute(v, "data-y").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_wait_for_missing_selector_times_out() {
        let mut d = loaded().await;
        d.wait_for_selector("tr.row", Duration::from_secs(1))
            .await
            .unwrap();
        let err = d
            .wait_for_selector("tr.calendar__row", Duration::from_secs(20))
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::WaitTimeout { timeout_ms: 20_000, .. }));
    }

    #[tokio::test]
    async fn test_invalid_selector() {
        let mut d = loaded().await;
        assert!(matches!(
            d.query_all(None, "tr[").await,
            Err(ScrapeError::InvalidSelector(_))
        ));
    }

    #[tokio::test]
    async fn test_close_drops_document() {
        let mut d = loaded().await;
        d.close().await.unwrap();
        assert!(matches!(
            d.query_all(None, "tr").await,
            Err(ScrapeError::NoPage)
        ));
    }
}
