//! Scripted in-memory page driver for testing.
//!
//! The page is a list of rows, each row a list of `(selector, element)`
//! cells. Row-scoped queries match a cell by exact selector string, which
//! is all the calendar scraper needs.

use std::collections::HashMap;
use std::future::ready;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::driver::{ElementHandle, LocalBoxFuture, PageDriver};
use crate::error::{ScrapeError, ScrapeResult};

/// A scripted element.
#[derive(Debug, Clone, Default)]
pub struct MockElement {
    /// `None` makes `read_text` fail, as with a detached element.
    text: Option<String>,
    attributes: HashMap<String, String>,
}

impl MockElement {
    /// Element with readable text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            attributes: HashMap::new(),
        }
    }

    /// Element whose text read fails.
    pub fn unreadable() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// A scripted table row.
#[derive(Debug, Clone, Default)]
pub struct MockRow {
    cells: Vec<(String, MockElement)>,
}

impl MockRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element reachable from this row by `selector`.
    #[must_use]
    pub fn with(mut self, selector: impl Into<String>, element: MockElement) -> Self {
        self.cells.push((selector.into(), element));
        self
    }
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<&'static str>,
    closed: bool,
}

/// Shared view of the calls a `MockPageDriver` received.
///
/// Stays readable after the driver itself has been moved or dropped.
#[derive(Debug, Clone, Default)]
pub struct MockDriverLog(Arc<Mutex<MockState>>);

impl MockDriverLog {
    /// Operation names in call order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.0.lock().calls.clone()
    }

    /// Number of calls to `op`.
    pub fn count(&self, op: &str) -> usize {
        self.0.lock().calls.iter().filter(|c| **c == op).count()
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.0.lock().closed
    }

    fn record(&self, op: &'static str) {
        self.0.lock().calls.push(op);
    }
}

#[derive(Debug, Clone, Copy)]
enum MockNode {
    Row(usize),
    Cell { row: usize, cell: usize },
}

/// Page driver over scripted rows.
#[derive(Debug)]
pub struct MockPageDriver {
    row_selector: String,
    rows: Vec<MockRow>,
    nodes: Vec<MockNode>,
    loaded: bool,
    fail_load: bool,
    fail_wait: bool,
    log: MockDriverLog,
}

impl MockPageDriver {
    /// Create a driver whose page has `rows`, matched by `row_selector`.
    pub fn new(row_selector: impl Into<String>, rows: Vec<MockRow>) -> Self {
        Self {
            row_selector: row_selector.into(),
            rows,
            nodes: Vec::new(),
            loaded: false,
            fail_load: false,
            fail_wait: false,
            log: MockDriverLog::default(),
        }
    }

    /// Make `load_page` fail.
    #[must_use]
    pub fn failing_load(mut self) -> Self {
        self.fail_load = true;
        self
    }

    /// Make `wait_for_selector` time out.
    #[must_use]
    pub fn failing_wait(mut self) -> Self {
        self.fail_wait = true;
        self
    }

    pub fn log(&self) -> MockDriverLog {
        self.log.clone()
    }

    fn node(&self, handle: ElementHandle) -> ScrapeResult<MockNode> {
        self.nodes
            .get(handle.id())
            .copied()
            .ok_or(ScrapeError::UnknownElement(handle.id()))
    }

    fn register(&mut self, node: MockNode) -> ElementHandle {
        self.nodes.push(node);
        ElementHandle::new(self.nodes.len() - 1)
    }

    fn cell(&self, row: usize, cell: usize) -> &MockElement {
        &self.rows[row].cells[cell].1
    }

    fn do_query_all(
        &mut self,
        scope: Option<ElementHandle>,
        selector: &str,
    ) -> ScrapeResult<Vec<ElementHandle>> {
        if !self.loaded {
            return Err(ScrapeError::NoPage);
        }
        let found: Vec<MockNode> = match scope {
            None if selector == self.row_selector => {
                (0..self.rows.len()).map(MockNode::Row).collect()
            }
            None => Vec::new(),
            Some(handle) => match self.node(handle)? {
                MockNode::Row(row) => self.rows[row]
                    .cells
                    .iter()
                    .enumerate()
                    .filter(|(_, (sel, _))| sel == selector)
                    .map(|(cell, _)| MockNode::Cell { row, cell })
                    .collect(),
                MockNode::Cell { .. } => Vec::new(),
            },
        };
        Ok(found.into_iter().map(|n| self.register(n)).collect())
    }

    fn do_read_text(&self, element: ElementHandle) -> ScrapeResult<String> {
        match self.node(element)? {
            MockNode::Row(row) => Ok(self.rows[row]
                .cells
                .iter()
                .filter_map(|(_, e)| e.text.clone())
                .collect::<Vec<_>>()
                .join(" ")),
            MockNode::Cell { row, cell } => self
                .cell(row, cell)
                .text
                .clone()
                .ok_or_else(|| ScrapeError::Driver("element is not readable".to_string())),
        }
    }

    fn do_read_attribute(&self, element: ElementHandle, name: &str) -> ScrapeResult<Option<String>> {
        match self.node(element)? {
            MockNode::Row(_) => Ok(None),
            MockNode::Cell { row, cell } => {
                Ok(self.cell(row, cell).attributes.get(name).cloned())
            }
        }
    }
}

impl PageDriver for MockPageDriver {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn load_page<'a>(
        &'a mut self,
        url: &'a str,
        _timeout: Duration,
    ) -> LocalBoxFuture<'a, ScrapeResult<()>> {
        self.log.record("load_page");
        self.nodes.clear();
        let result = if self.fail_load {
            Err(ScrapeError::PageLoad(format!("{url}: connection refused")))
        } else {
            self.loaded = true;
            Ok(())
        };
        Box::pin(ready(result))
    }

    fn wait_for_selector<'a>(
        &'a mut self,
        selector: &'a str,
        timeout: Duration,
    ) -> LocalBoxFuture<'a, ScrapeResult<()>> {
        self.log.record("wait_for_selector");
        let matched = self.loaded && selector == self.row_selector && !self.rows.is_empty();
        let result = if self.fail_wait || !matched {
            Err(ScrapeError::WaitTimeout {
                selector: selector.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            })
        } else {
            Ok(())
        };
        Box::pin(ready(result))
    }

    fn query_all<'a>(
        &'a mut self,
        scope: Option<ElementHandle>,
        selector: &'a str,
    ) -> LocalBoxFuture<'a, ScrapeResult<Vec<ElementHandle>>> {
        self.log.record("query_all");
        Box::pin(ready(self.do_query_all(scope, selector)))
    }

    fn scroll_into_view(&mut self, element: ElementHandle) -> LocalBoxFuture<'_, ScrapeResult<()>> {
        self.log.record("scroll_into_view");
        Box::pin(ready(self.node(element).map(|_| ())))
    }

    fn read_text(&mut self, element: ElementHandle) -> LocalBoxFuture<'_, ScrapeResult<String>> {
        self.log.record("read_text");
        Box::pin(ready(self.do_read_text(element)))
    }

    fn read_attribute<'a>(
        &'a mut self,
        element: ElementHandle,
        name: &'a str,
    ) -> LocalBoxFuture<'a, ScrapeResult<Option<String>>> {
        self.log.record("read_attribute");
        Box::pin(ready(self.do_read_attribute(element, name)))
    }

    fn close(&mut self) -> LocalBoxFuture<'_, ScrapeResult<()>> {
        self.log.record("close");
        self.log.0.lock().closed = true;
        self.loaded = false;
        Box::pin(ready(Ok(())))
    }
}
