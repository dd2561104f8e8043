//! Notification report rendering.
//!
//! The body layout is consumed by a Markdown-rendering chat client, so the
//! section markers and wording are kept stable.

use crate::event::EventRecord;
use crate::quote::Quote;
use crate::table::render_table;

/// Title used when there are high-impact events to report.
pub const TITLE_HIGH_IMPACT: &str = "📢 交易提醒：高影响事件更新";
/// Title used when the calendar has no high-impact events.
pub const TITLE_NO_HIGH_IMPACT: &str = "📢 无高影响力事件";
/// Body used when the calendar has no high-impact events.
pub const BODY_NO_HIGH_IMPACT: &str = "今天无高影响力经济事件。";

const INDICATOR_HEADING: &str = "📈 当前市场关键指标：";
const DIVERGENT_HEADING: &str = "📢 近日高影响力经济事件实际值与预期值不同：";
const DIVERGENT_EMPTY: &str = "暂无实际值与预期值不同的数据。";
const ALL_HIGH_HEADING: &str = "📋 全部高影响力事件一览：";
const SEPARATOR_CHAR: char = '—';
const SEPARATOR_LEN: usize = 30;

const INDICATOR_COLUMNS: [&str; 2] = ["指标", "数值"];
const EVENT_COLUMNS: [&str; 7] = [
    "Date", "Currency", "Impact", "Event", "Actual", "Forecast", "Previous",
];

/// A rendered notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub title: String,
    pub body: String,
}

/// Render the indicator table (label / value).
pub fn indicator_table(quotes: &[Quote]) -> String {
    let rows: Vec<Vec<&str>> = quotes
        .iter()
        .map(|q| vec![q.label.as_str(), q.value.as_str()])
        .collect();
    render_table(&INDICATOR_COLUMNS, &rows)
}

/// Render event records as a table with every column.
pub fn event_table(records: &[EventRecord]) -> String {
    let impacts: Vec<String> = records.iter().map(|r| r.impact.to_string()).collect();
    let rows: Vec<Vec<&str>> = records
        .iter()
        .zip(&impacts)
        .map(|(r, impact)| {
            vec![
                r.date.as_str(),
                r.currency.as_str(),
                impact.as_str(),
                r.event_title.as_str(),
                r.actual.as_str(),
                r.forecast.as_str(),
                r.previous.as_str(),
            ]
        })
        .collect();
    render_table(&EVENT_COLUMNS, &rows)
}

/// Render one detail block for a high-impact event (two lines).
pub fn event_entry(record: &EventRecord) -> String {
    format!(
        "📅 {} | {} | {}\n预测: {} | 公布: {} | 前值: {}",
        record.date,
        record.currency,
        record.event_title,
        record.forecast,
        record.actual,
        record.previous
    )
}

/// Build the notification for one run.
///
/// `high` is the full high-impact list and `divergent` its subset whose
/// actual differs from forecast. An empty `high` yields the short
/// "no events" notification.
pub fn build_report(quotes: &[Quote], high: &[EventRecord], divergent: &[EventRecord]) -> Report {
    if high.is_empty() {
        return Report {
            title: TITLE_NO_HIGH_IMPACT.to_string(),
            body: BODY_NO_HIGH_IMPACT.to_string(),
        };
    }

    let mut body = String::new();
    body.push_str(INDICATOR_HEADING);
    body.push_str("\n\n");
    body.push_str(&indicator_table(quotes));

    body.push_str("\n\n");
    body.push_str(DIVERGENT_HEADING);
    body.push_str("\n\n");
    if divergent.is_empty() {
        body.push_str(DIVERGENT_EMPTY);
    } else {
        body.push_str(&event_table(divergent));
    }

    body.push_str("\n\n");
    body.extend(std::iter::repeat(SEPARATOR_CHAR).take(SEPARATOR_LEN));
    body.push_str("\n\n");

    body.push_str(ALL_HIGH_HEADING);
    body.push_str("\n\n");
    for record in high {
        body.push_str(&event_entry(record));
        body.push_str("\n\n");
    }

    Report {
        title: TITLE_HIGH_IMPACT.to_string(),
        body,
    }
}
