//! Page driver backed by a WebDriver session (chromedriver, geckodriver).

use std::time::Duration;

use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::wd::TimeoutConfiguration;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use tracing::{debug, info};

use crate::driver::{normalize_text, ElementHandle, LocalBoxFuture, PageDriver};
use crate::error::{ScrapeError, ScrapeResult};

/// Script used to scroll an element into the viewport.
const SCROLL_SCRIPT: &str = "arguments[0].scrollIntoView({block: 'center', inline: 'nearest'});";

/// Extra time the local timer grants over the browser-side page-load limit.
const LOAD_BACKSTOP_MARGIN: Duration = Duration::from_secs(5);

/// Session timeouts: navigation is bounded inside the browser, so an
/// abandoned `goto` cannot hold the session past `page_load`.
fn session_timeouts(page_load: Duration) -> TimeoutConfiguration {
    TimeoutConfiguration::new(None, Some(page_load), None)
}

/// A live browser session.
///
/// Elements found through `query_all` are kept in a registry and addressed
/// by index; the registry is cleared on every navigation.
pub struct WebDriverPage {
    client: Option<Client>,
    elements: Vec<Element>,
}

impl WebDriverPage {
    /// Open a Chrome session through the WebDriver endpoint at `webdriver_url`.
    ///
    /// `page_load` becomes the session's page-load timeout.
    ///
    /// # Errors
    /// Returns `ScrapeError::Driver` if the session cannot be created or
    /// configured. A half-open session is closed before returning.
    pub async fn connect(
        webdriver_url: &str,
        user_agent: &str,
        headless: bool,
        page_load: Duration,
    ) -> ScrapeResult<Self> {
        let mut args = vec![
            format!("--user-agent={user_agent}"),
            "--lang=en-US".to_string(),
            "--window-size=1920,1080".to_string(),
            "--disable-gpu".to_string(),
        ];
        if headless {
            args.push("--headless=new".to_string());
        }

        let mut capabilities = serde_json::Map::new();
        capabilities.insert(
            "goog:chromeOptions".to_string(),
            json!({
                "args": args,
                "prefs": { "intl.accept_languages": "en-US" }
            }),
        );

        let mut builder = ClientBuilder::native();
        builder.capabilities(capabilities);
        let client = builder
            .connect(webdriver_url)
            .await
            .map_err(|e| ScrapeError::Driver(format!("WebDriver session failed: {e}")))?;

        if let Err(e) = client.update_timeouts(session_timeouts(page_load)).await {
            let _ = client.close().await;
            return Err(cmd_error("set session timeouts", e));
        }

        info!(
            webdriver_url = %webdriver_url,
            headless,
            page_load_ms = page_load.as_millis() as u64,
            "WebDriver session opened"
        );

        Ok(Self {
            client: Some(client),
            elements: Vec::new(),
        })
    }

    fn client(&self) -> ScrapeResult<&Client> {
        self.client.as_ref().ok_or(ScrapeError::NoPage)
    }

    fn element(&self, handle: ElementHandle) -> ScrapeResult<&Element> {
        self.elements
            .get(handle.id())
            .ok_or(ScrapeError::UnknownElement(handle.id()))
    }

    fn register(&mut self, found: Vec<Element>) -> Vec<ElementHandle> {
        let start = self.elements.len();
        self.elements.extend(found);
        (start..self.elements.len()).map(ElementHandle::new).collect()
    }
}

fn cmd_error(context: &str, e: CmdError) -> ScrapeError {
    ScrapeError::Driver(format!("{context}: {e}"))
}

impl PageDriver for WebDriverPage {
    fn name(&self) -> &'static str {
        "webdriver"
    }

    fn load_page<'a>(
        &'a mut self,
        url: &'a str,
        timeout: Duration,
    ) -> LocalBoxFuture<'a, ScrapeResult<()>> {
        Box::pin(async move {
            self.elements.clear();
            let client = self.client()?;
            // The browser enforces `timeout`; the local timer is only a backstop.
            match tokio::time::timeout(timeout + LOAD_BACKSTOP_MARGIN, client.goto(url)).await {
                Ok(Ok(())) => {
                    debug!(url = %url, "Page loaded");
                    Ok(())
                }
                Ok(Err(e)) => Err(ScrapeError::PageLoad(format!("{url}: {e}"))),
                Err(_) => Err(ScrapeError::PageLoad(format!(
                    "{url}: not loaded within {}ms",
                    timeout.as_millis()
                ))),
            }
        })
    }

    fn wait_for_selector<'a>(
        &'a mut self,
        selector: &'a str,
        timeout: Duration,
    ) -> LocalBoxFuture<'a, ScrapeResult<()>> {
        Box::pin(async move {
            let client = self.client()?;
            match client
                .wait()
                .at_most(timeout)
                .for_element(Locator::Css(selector))
                .await
            {
                Ok(_) => Ok(()),
                Err(CmdError::WaitTimeout) => Err(ScrapeError::WaitTimeout {
                    selector: selector.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                }),
                Err(e) => Err(cmd_error("wait_for_selector", e)),
            }
        })
    }

    fn query_all<'a>(
        &'a mut self,
        scope: Option<ElementHandle>,
        selector: &'a str,
    ) -> LocalBoxFuture<'a, ScrapeResult<Vec<ElementHandle>>> {
        Box::pin(async move {
            let found = match scope {
                Some(handle) => self.element(handle)?.find_all(Locator::Css(selector)).await,
                None => self.client()?.find_all(Locator::Css(selector)).await,
            }
            .map_err(|e| cmd_error("query_all", e))?;
            Ok(self.register(found))
        })
    }

    fn scroll_into_view(&mut self, element: ElementHandle) -> LocalBoxFuture<'_, ScrapeResult<()>> {
        Box::pin(async move {
            let arg = serde_json::to_value(self.element(element)?)
                .map_err(|e| ScrapeError::Driver(format!("scroll_into_view: {e}")))?;
            self.client()?
                .execute(SCROLL_SCRIPT, vec![arg])
                .await
                .map_err(|e| cmd_error("scroll_into_view", e))?;
            Ok(())
        })
    }

    fn read_text(&mut self, element: ElementHandle) -> LocalBoxFuture<'_, ScrapeResult<String>> {
        Box::pin(async move {
            let text = self
                .element(element)?
                .text()
                .await
                .map_err(|e| cmd_error("read_text", e))?;
            Ok(normalize_text(&text))
        })
    }

    fn read_attribute<'a>(
        &'a mut self,
        element: ElementHandle,
        name: &'a str,
    ) -> LocalBoxFuture<'a, ScrapeResult<Option<String>>> {
        Box::pin(async move {
            self.element(element)?
                .attr(name)
                .await
                .map_err(|e| cmd_error("read_attribute", e))
        })
    }

    fn close(&mut self) -> LocalBoxFuture<'_, ScrapeResult<()>> {
        Box::pin(async move {
            self.elements.clear();
            match self.client.take() {
                Some(client) => {
                    client.close().await.map_err(|e| cmd_error("close", e))?;
                    info!("WebDriver session closed");
                    Ok(())
                }
                None => Ok(()),
            }
        })
    }
}
