//! Read-only aggregations computed over a bounded scan of recent events.
//!
//! Every query here recomputes from scratch on each invocation — no cache,
//! no incremental counters. Summaries scan at most [`SCAN_LIMIT`] of the
//! most recent records, so totals are "within the scan window" rather than
//! full-corpus counts. That bound is a deliberate product limitation, not
//! an implementation accident.

use chrono::{Duration, NaiveDate};
use event_bus::TrackingEvent;
use serde::Serialize;
use std::collections::HashMap;

/// Upper bound on how many recent records a summary scans.
pub const SCAN_LIMIT: i64 = 1000;

/// Trailing calendar days covered by the page-view summary.
pub const SUMMARY_DAYS: i64 = 7;

/// Rows returned by the top-pages histogram.
pub const TOP_PAGES_LIMIT: usize = 10;

/// Rows returned by the click-element histogram.
pub const TOP_ELEMENTS_LIMIT: usize = 5;

/// Envelopes returned by the recent-events feed.
pub const RECENT_LIMIT: i64 = 50;

pub const PAGE_VIEW: &str = "page_view";
pub const CLICK: &str = "click";
pub const USER_INTERACTION: &str = "user_interaction";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPageViews {
    pub date: NaiveDate,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageViewsSummary {
    /// One entry per trailing day, oldest first, zero-filled
    pub daily: Vec<DailyPageViews>,
    /// All `page_view` events within the scan window
    pub total_page_views: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCount {
    pub url: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPages {
    pub pages: Vec<PageCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementCount {
    pub element: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickSummary {
    pub elements: Vec<ElementCount>,
    pub total_clicks: u64,
}

fn data_str<'a>(event: &'a TrackingEvent, key: &str) -> Option<&'a str> {
    event.data.get(key).and_then(|v| v.as_str())
}

/// Page-view count per calendar day (UTC) for the trailing
/// [`SUMMARY_DAYS`] days ending at `today`, zero-filled, plus the total
/// page-view count within the scanned events.
pub fn page_views_summary(events: &[TrackingEvent], today: NaiveDate) -> PageViewsSummary {
    let mut per_day: HashMap<NaiveDate, u64> = HashMap::new();
    let mut total = 0u64;

    for event in events {
        if event.event != PAGE_VIEW {
            continue;
        }
        total += 1;
        *per_day.entry(event.timestamp.date_naive()).or_insert(0) += 1;
    }

    let daily = (0..SUMMARY_DAYS)
        .rev()
        .map(|back| {
            let date = today - Duration::days(back);
            DailyPageViews {
                date,
                count: per_day.get(&date).copied().unwrap_or(0),
            }
        })
        .collect();

    PageViewsSummary {
        daily,
        total_page_views: total,
    }
}

/// Page-view histogram grouped by `data.url`, descending, top
/// [`TOP_PAGES_LIMIT`]. Ties break on URL so repeated reads are identical.
pub fn top_pages(events: &[TrackingEvent]) -> TopPages {
    let mut counts: HashMap<&str, u64> = HashMap::new();

    for event in events.iter().filter(|e| e.event == PAGE_VIEW) {
        if let Some(url) = data_str(event, "url") {
            *counts.entry(url).or_insert(0) += 1;
        }
    }

    let mut pages: Vec<PageCount> = counts
        .into_iter()
        .map(|(url, count)| PageCount {
            url: url.to_string(),
            count,
        })
        .collect();
    pages.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.url.cmp(&b.url)));
    pages.truncate(TOP_PAGES_LIMIT);

    TopPages { pages }
}

/// Histogram of `click` and `user_interaction` events grouped by
/// `data.element`, descending, top [`TOP_ELEMENTS_LIMIT`], plus the total
/// count of such events within the scan.
pub fn click_summary(events: &[TrackingEvent]) -> ClickSummary {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    let mut total = 0u64;

    for event in events
        .iter()
        .filter(|e| e.event == CLICK || e.event == USER_INTERACTION)
    {
        total += 1;
        if let Some(element) = data_str(event, "element") {
            *counts.entry(element).or_insert(0) += 1;
        }
    }

    let mut elements: Vec<ElementCount> = counts
        .into_iter()
        .map(|(element, count)| ElementCount {
            element: element.to_string(),
            count,
        })
        .collect();
    elements.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.element.cmp(&b.element)));
    elements.truncate(TOP_ELEMENTS_LIMIT);

    ClickSummary {
        elements,
        total_clicks: total,
    }
}
