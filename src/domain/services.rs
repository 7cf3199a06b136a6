//! Domain services
//!
//! Capabilities the crawl loop depends on but does not implement itself:
//! fetching pages, pacing requests, reporting progress and storing records.

use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

use super::crawl_state::{PageProgress, TerminationReason};
use super::errors::{FetchError, SinkError};
use super::item_record::ItemRecord;

/// Page fetching service. One call issues exactly one request.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return the raw page text
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Inter-page pause. The only suspension point of a crawl.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Progress side channel. Advisory only; nothing here affects the dataset.
pub trait CrawlObserver: Send + Sync {
    fn on_page_processed(&self, _progress: &PageProgress) {}

    /// Clear whatever interactive display is showing progress
    fn on_clear_display(&self) {}

    fn on_terminated(&self, _reason: &TerminationReason) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl CrawlObserver for NullObserver {}

/// Observer that reports through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CrawlObserver for TracingObserver {
    fn on_page_processed(&self, progress: &PageProgress) {
        info!(
            requests_per_second = progress.requests_per_second,
            "processed {:.3} requests/s",
            progress.requests_per_second
        );
        info!(
            page = progress.page_num,
            max_pages = progress.max_pages,
            records_on_page = progress.records_on_page,
            records_total = progress.records_total,
            "{}/{} pages processed",
            progress.page_num,
            progress.max_pages
        );
    }

    fn on_terminated(&self, reason: &TerminationReason) {
        info!(reason = reason.label(), "{}", reason);
    }
}

/// Tabular storage for extracted records
pub trait DatasetSink {
    fn append(&mut self, record: &ItemRecord) -> Result<(), SinkError>;

    /// Flush everything appended so far to durable storage
    fn persist(&mut self) -> Result<(), SinkError>;
}
