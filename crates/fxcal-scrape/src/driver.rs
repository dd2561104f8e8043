//! Page driver capability.
//!
//! The calendar scraper only needs a handful of browser operations. This
//! trait names exactly those, so the extraction logic does not depend on
//! which automation engine (or static HTML) backs the page.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::error::ScrapeResult;

/// Boxed future for dyn-compatible async trait methods.
///
/// Drivers run on a current-thread runtime, so the futures are not `Send`.
pub type LocalBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Opaque reference to an element owned by a driver.
///
/// Handles are only meaningful to the driver that issued them and only
/// until the next `load_page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(usize);

impl ElementHandle {
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    pub fn id(&self) -> usize {
        self.0
    }
}

/// Browser operations used by the scrapers.
pub trait PageDriver {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// Navigate to `url`, failing if the page is not loaded within `timeout`.
    fn load_page<'a>(
        &'a mut self,
        url: &'a str,
        timeout: Duration,
    ) -> LocalBoxFuture<'a, ScrapeResult<()>>;

    /// Wait until at least one element matches `selector`.
    ///
    /// Returns `ScrapeError::WaitTimeout` when nothing matches within `timeout`.
    fn wait_for_selector<'a>(
        &'a mut self,
        selector: &'a str,
        timeout: Duration,
    ) -> LocalBoxFuture<'a, ScrapeResult<()>>;

    /// All elements matching `selector`, in document order.
    ///
    /// With a `scope`, only descendants of that element are considered.
    fn query_all<'a>(
        &'a mut self,
        scope: Option<ElementHandle>,
        selector: &'a str,
    ) -> LocalBoxFuture<'a, ScrapeResult<Vec<ElementHandle>>>;

    /// Scroll the element into the viewport to trigger lazy rendering.
    fn scroll_into_view(&mut self, element: ElementHandle) -> LocalBoxFuture<'_, ScrapeResult<()>>;

    /// Rendered text of the element.
    fn read_text(&mut self, element: ElementHandle) -> LocalBoxFuture<'_, ScrapeResult<String>>;

    /// Attribute value, `None` if the attribute is absent.
    fn read_attribute<'a>(
        &'a mut self,
        element: ElementHandle,
        name: &'a str,
    ) -> LocalBoxFuture<'a, ScrapeResult<Option<String>>>;

    /// Release the session. Safe to call more than once.
    fn close(&mut self) -> LocalBoxFuture<'_, ScrapeResult<()>>;
}

/// First element matching `selector` (within `scope` if given).
pub async fn query_first(
    driver: &mut dyn PageDriver,
    scope: Option<ElementHandle>,
    selector: &str,
) -> ScrapeResult<Option<ElementHandle>> {
    Ok(driver.query_all(scope, selector).await?.into_iter().next())
}

/// Collapse runs of whitespace to single spaces and trim.
pub(crate) fn normalize_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Mon\n  Jan 6 "), "Mon Jan 6");
        assert_eq!(normalize_text("\n\t"), "");
    }

    #[test]
    fn test_element_handle_id() {
        assert_eq!(ElementHandle::new(7).id(), 7);
    }
}
