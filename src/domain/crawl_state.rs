//! Loop state of a single crawl and the reasons it can stop

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use url::Url;

/// Mutable state owned by the pagination loop for one crawl
#[derive(Debug, Clone)]
pub struct CrawlState {
    /// 1-based number of the page currently being processed
    pub page_num: u32,
    /// Fetches issued so far, successful or not
    pub request_count: u32,
    pub rows_seen: usize,
    pub rows_skipped: usize,
    started_at: Instant,
}

impl CrawlState {
    pub fn new() -> Self {
        Self {
            page_num: 1,
            request_count: 0,
            rows_seen: 0,
            rows_skipped: 0,
            started_at: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Requests per second since the crawl started. Advisory only.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs <= f64::EPSILON {
            return f64::from(self.request_count);
        }
        f64::from(self.request_count) / secs
    }
}

impl Default for CrawlState {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks the inputs of a crawl before anything is fetched.
///
/// `max_pages` must be at least 1, `pause_seconds` finite and non-negative,
/// and `start_url` an absolute URL with a host.
pub fn check_crawl_preconditions(max_pages: u32, pause_seconds: f64, start_url: &str) -> Result<(), String> {
    if max_pages == 0 {
        return Err("max_pages must be at least 1".to_string());
    }
    if Duration::try_from_secs_f64(pause_seconds).is_err() {
        return Err(format!(
            "pause_seconds must be a non-negative number of seconds that fits a duration, got {pause_seconds}"
        ));
    }
    let url = Url::parse(start_url).map_err(|e| format!("start_url '{start_url}' is not an absolute URL: {e}"))?;
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(format!("start_url '{start_url}' has no host"));
    }
    Ok(())
}

/// Snapshot reported to observers after each processed page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageProgress {
    pub page_num: u32,
    pub max_pages: u32,
    pub records_on_page: usize,
    pub records_total: usize,
    pub request_count: u32,
    pub requests_per_second: f64,
}

/// Why a crawl stopped. Every variant is a normal, successful end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TerminationReason {
    /// `page_num` reached `max_pages`
    PageBudgetReached,

    /// The current page has no next-page anchor (or the anchor has no href)
    NextLinkAbsent,

    /// The next-page href did not produce a valid absolute URL
    NextLinkInvalid { href: String, reason: String },

    /// The next page could not be fetched
    NextPageFetchFailed { url: String, reason: String },

    /// The next page was fetched but could not be parsed
    NextPageParseFailed { url: String, reason: String },
}

impl TerminationReason {
    pub fn is_page_budget(&self) -> bool {
        matches!(self, Self::PageBudgetReached)
    }

    /// True for every "no further pages reachable" variant
    pub fn is_end_of_data(&self) -> bool {
        !self.is_page_budget()
    }

    /// Short machine-friendly label, used as a log field
    pub fn label(&self) -> &'static str {
        match self {
            Self::PageBudgetReached => "page_budget_reached",
            Self::NextLinkAbsent => "next_link_absent",
            Self::NextLinkInvalid { .. } => "next_link_invalid",
            Self::NextPageFetchFailed { .. } => "next_page_fetch_failed",
            Self::NextPageParseFailed { .. } => "next_page_parse_failed",
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PageBudgetReached => f.write_str("terminated because total page specified reached"),
            Self::NextLinkAbsent => f.write_str(
                "terminated because no more pages can be accessed from the website (no next link)",
            ),
            Self::NextLinkInvalid { href, reason } => write!(
                f,
                "terminated because no more pages can be accessed from the website (invalid next link '{href}': {reason})"
            ),
            Self::NextPageFetchFailed { url, reason } => write!(
                f,
                "terminated because no more pages can be accessed from the website (fetch of {url} failed: {reason})"
            ),
            Self::NextPageParseFailed { url, reason } => write!(
                f,
                "terminated because no more pages can be accessed from the website (parse of {url} failed: {reason})"
            ),
        }
    }
}
