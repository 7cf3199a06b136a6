//! Sequential pagination over a ranking list
//!
//! One fetch per iteration, a pause before every fetch except the first, and
//! a termination check after each processed page:
//!
//! 1. `page_num == max_pages` ends the crawl with
//!    [`TerminationReason::PageBudgetReached`].
//! 2. Otherwise the next-page anchor is followed. A missing anchor, an
//!    unusable href, a failed fetch or an unparseable page all end the crawl
//!    as "no further pages reachable".
//!
//! Only a failure on the first page is an error. Next-page URLs are built
//! from the start URL's site root, never from the current page's URL.

use serde::Serialize;
use std::time::Duration;
use tracing::{Instrument, debug, info, info_span, warn};
use url::Url;
use uuid::Uuid;

use super::crawl_error::CrawlError;
use crate::domain::crawl_state::{CrawlState, PageProgress, TerminationReason, check_crawl_preconditions};
use crate::domain::dataset::Dataset;
use crate::domain::services::{CrawlObserver, Pacer, PageFetcher};
use crate::infrastructure::config::CrawlConfig;
use crate::infrastructure::parsing::{
    CompiledSelectors, ItemRecordExtractor, ListingPage, ListingSelectors, NextLink, PageExtraction, ParsingError,
    ParsingResult,
};

/// Inputs of one crawl
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrawlParams {
    pub max_pages: u32,
    pub pause_seconds: f64,
    pub start_url: String,
    pub suppress_interactive_output: bool,
}

impl CrawlParams {
    pub fn new(max_pages: u32, pause_seconds: f64, start_url: impl Into<String>) -> Self {
        Self {
            max_pages,
            pause_seconds,
            start_url: start_url.into(),
            suppress_interactive_output: true,
        }
    }

    pub fn with_suppress_interactive_output(mut self, suppress: bool) -> Self {
        self.suppress_interactive_output = suppress;
        self
    }

    pub fn validate(&self) -> Result<(), CrawlError> {
        check_crawl_preconditions(self.max_pages, self.pause_seconds, &self.start_url)
            .map_err(CrawlError::InvalidParameters)
    }

    pub fn pause(&self) -> Result<Duration, CrawlError> {
        Duration::try_from_secs_f64(self.pause_seconds)
            .map_err(|e| CrawlError::InvalidParameters(format!("pause_seconds {}: {e}", self.pause_seconds)))
    }
}

impl From<&CrawlConfig> for CrawlParams {
    fn from(config: &CrawlConfig) -> Self {
        Self {
            max_pages: config.max_pages,
            pause_seconds: config.pause_seconds,
            start_url: config.start_url.clone(),
            suppress_interactive_output: config.suppress_interactive_output,
        }
    }
}

/// Outcome of a crawl that produced a dataset
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub session_id: Uuid,
    pub dataset: Dataset,
    /// Pages whose rows made it into the dataset
    pub pages_processed: u32,
    /// Fetches issued, including a failed final one
    pub request_count: u32,
    pub rows_seen: usize,
    pub rows_skipped: usize,
    pub termination: TerminationReason,
    pub elapsed: Duration,
}

/// What the loop keeps of a page once its document is dropped
struct PageStep {
    extraction: PageExtraction,
    next: NextLink,
}

/// Drives a crawl over a [`PageFetcher`]
pub struct PaginationController<F, O, P> {
    fetcher: F,
    extractor: ItemRecordExtractor,
    observer: O,
    pacer: P,
}

impl<F, O, P> PaginationController<F, O, P>
where
    F: PageFetcher,
    O: CrawlObserver,
    P: Pacer,
{
    /// Selectors are compiled here, so a bad selector fails before any fetch
    pub fn new(fetcher: F, selectors: &ListingSelectors, observer: O, pacer: P) -> Result<Self, CrawlError> {
        let compiled = CompiledSelectors::compile(selectors).map_err(CrawlError::Selector)?;
        Ok(Self {
            fetcher,
            extractor: ItemRecordExtractor::new(compiled),
            observer,
            pacer,
        })
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    /// Run one crawl to completion
    pub async fn run(&self, params: &CrawlParams) -> Result<CrawlReport, CrawlError> {
        params.validate()?;

        let session_id = Uuid::new_v4();
        let span = info_span!("crawl", session_id = %session_id, start_url = %params.start_url);

        self.run_session(session_id, params).instrument(span).await
    }

    async fn run_session(&self, session_id: Uuid, params: &CrawlParams) -> Result<CrawlReport, CrawlError> {
        let site_root = site_root(&params.start_url)?;
        let pause = params.pause()?;
        let mut state = CrawlState::new();
        let mut dataset = Dataset::new();

        info!(
            max_pages = params.max_pages,
            pause_seconds = params.pause_seconds,
            "Starting crawl"
        );

        state.request_count += 1;
        let raw = self
            .fetcher
            .fetch(&params.start_url)
            .await
            .map_err(|source| CrawlError::StartPageUnreachable {
                url: params.start_url.clone(),
                source,
            })?;

        let mut step = self
            .inspect_page(&raw)
            .map_err(|source| CrawlError::StartPageUnparseable {
                url: params.start_url.clone(),
                source,
            })?;

        let termination = loop {
            self.record_page(&mut state, &mut dataset, step.extraction, params.max_pages);

            if state.page_num >= params.max_pages {
                break TerminationReason::PageBudgetReached;
            }

            let href = match step.next {
                NextLink::Href(href) => href,
                NextLink::Absent | NextLink::MissingHref => break TerminationReason::NextLinkAbsent,
            };

            let next_url = match resolve_next_url(&site_root, &href) {
                Ok(url) => url,
                Err(e) => {
                    break TerminationReason::NextLinkInvalid {
                        href,
                        reason: e.to_string(),
                    };
                }
            };

            self.pacer.pause(pause).await;
            if params.suppress_interactive_output {
                self.observer.on_clear_display();
            }

            state.request_count += 1;
            let raw = match self.fetcher.fetch(&next_url).await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("Next page fetch failed: {}", e);
                    break TerminationReason::NextPageFetchFailed {
                        url: next_url,
                        reason: e.to_string(),
                    };
                }
            };

            step = match self.inspect_page(&raw) {
                Ok(step) => step,
                Err(e) => {
                    warn!("Next page could not be parsed: {}", e);
                    break TerminationReason::NextPageParseFailed {
                        url: next_url,
                        reason: e.to_string(),
                    };
                }
            };
            state.page_num += 1;
        };

        self.observer.on_terminated(&termination);
        info!(
            pages = state.page_num,
            records = dataset.len(),
            rows_skipped = state.rows_skipped,
            "Crawl finished: {}",
            termination.label()
        );

        Ok(CrawlReport {
            session_id,
            dataset,
            pages_processed: state.page_num,
            request_count: state.request_count,
            rows_seen: state.rows_seen,
            rows_skipped: state.rows_skipped,
            termination,
            elapsed: state.elapsed(),
        })
    }

    /// Parse, extract and look up the next link. The document never outlives
    /// this call, so it is never held across an await.
    fn inspect_page(&self, raw: &str) -> ParsingResult<PageStep> {
        let page = ListingPage::parse(raw, self.extractor.selectors())?;
        Ok(PageStep {
            extraction: self.extractor.extract_page(&page),
            next: page.next_link(),
        })
    }

    fn record_page(&self, state: &mut CrawlState, dataset: &mut Dataset, extraction: PageExtraction, max_pages: u32) {
        if extraction.shape_mismatches > 0 {
            debug!(
                page = state.page_num,
                "Skipped {} rows without the expected info layout",
                extraction.shape_mismatches
            );
        }
        for failure in &extraction.field_failures {
            warn!(page = state.page_num, "Skipped row with malformed field: {}", failure);
        }

        state.rows_seen += extraction.rows_seen;
        state.rows_skipped += extraction.rows_skipped();
        let records_on_page = extraction.records.len();
        dataset.extend(extraction.records);

        self.observer.on_page_processed(&PageProgress {
            page_num: state.page_num,
            max_pages,
            records_on_page,
            records_total: dataset.len(),
            request_count: state.request_count,
            requests_per_second: state.throughput(),
        });
    }
}

/// Start URL text up to its query or fragment, kept exactly as given
pub fn site_root(start_url: &str) -> Result<String, CrawlError> {
    Url::parse(start_url).map_err(|e| CrawlError::InvalidParameters(format!("start_url '{start_url}': {e}")))?;
    let root = start_url.split(['?', '#']).next().unwrap_or(start_url);
    Ok(root.to_string())
}

/// `site_root` followed directly by `href`; the result must be an absolute URL
pub fn resolve_next_url(site_root: &str, href: &str) -> ParsingResult<String> {
    let failed = |url: &str, reason: String| ParsingError::UrlResolutionFailed {
        url: url.to_string(),
        reason,
        base_url: Some(site_root.to_string()),
    };

    let href = href.trim();
    if href.is_empty() {
        return Err(failed(href, "empty href".to_string()));
    }

    let candidate = format!("{site_root}{href}");
    match Url::parse(&candidate) {
        Ok(_) => Ok(candidate),
        Err(e) => Err(failed(&candidate, e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_root_drops_query_and_fragment() {
        assert_eq!(
            site_root("https://myanimelist.net/topanime.php?limit=50#top").unwrap(),
            "https://myanimelist.net/topanime.php"
        );
        assert_eq!(
            site_root("https://myanimelist.net/topanime.php").unwrap(),
            "https://myanimelist.net/topanime.php"
        );
    }

    #[test]
    fn test_bare_host_root_is_not_reserialized() {
        let root = site_root("https://example.com").unwrap();
        assert_eq!(root, "https://example.com");
        assert_eq!(
            resolve_next_url(&root, "/rank?page=2").unwrap(),
            "https://example.com/rank?page=2"
        );
    }

    #[test]
    fn test_next_url_is_site_root_plus_href() {
        let root = "https://myanimelist.net/topanime.php";
        assert_eq!(
            resolve_next_url(root, "?limit=100").unwrap(),
            "https://myanimelist.net/topanime.php?limit=100"
        );
        assert!(matches!(
            resolve_next_url(root, "   "),
            Err(ParsingError::UrlResolutionFailed { base_url: Some(_), .. })
        ));
    }

    #[test]
    fn test_params_from_config() {
        let params = CrawlParams::from(&CrawlConfig::default());
        assert_eq!(params.max_pages, 400);
        assert!(params.suppress_interactive_output);
        assert!(params.validate().is_ok());
        assert_eq!(params.pause().unwrap(), Duration::from_secs(6));
    }

    #[test]
    fn test_invalid_params_are_rejected() {
        let params = CrawlParams::new(0, 1.0, "https://myanimelist.net/topanime.php");
        assert!(matches!(params.validate(), Err(CrawlError::InvalidParameters(_))));
    }

    #[test]
    fn test_oversized_pause_is_rejected_not_zeroed() {
        let params = CrawlParams::new(3, 1e30, "https://myanimelist.net/topanime.php");
        assert!(matches!(params.validate(), Err(CrawlError::InvalidParameters(_))));
        assert!(matches!(params.pause(), Err(CrawlError::InvalidParameters(_))));
    }
}
