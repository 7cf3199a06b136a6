//! Entry points over [`PaginationController`] with the production collaborators
//!
//! [`scrape`] returns the dataset directly. [`AnimeListScraper`] keeps the
//! last dataset around so it can be saved afterwards.

use std::path::Path;

use super::crawl_error::CrawlError;
use super::pagination_controller::{CrawlParams, CrawlReport, PaginationController};
use crate::domain::dataset::Dataset;
use crate::domain::errors::SinkError;
use crate::domain::services::{CrawlObserver, Pacer, PageFetcher, TokioPacer, TracingObserver};
use crate::infrastructure::http_client::{HttpClient, HttpClientConfig};
use crate::infrastructure::parsing::ListingSelectors;

/// Controller wired to reqwest, the tokio timer and tracing output
pub type DefaultController = PaginationController<HttpClient, TracingObserver, TokioPacer>;

/// Build a controller from HTTP settings and selectors
pub fn default_controller(http: HttpClientConfig, selectors: &ListingSelectors) -> Result<DefaultController, CrawlError> {
    let client = HttpClient::new(http)?;
    PaginationController::new(client, selectors, TracingObserver, TokioPacer)
}

/// Crawl with default HTTP settings and selectors and return the dataset
pub async fn scrape(
    max_pages: u32,
    pause_seconds: f64,
    start_url: &str,
    suppress_interactive_output: bool,
) -> Result<Dataset, CrawlError> {
    let params = CrawlParams::new(max_pages, pause_seconds, start_url)
        .with_suppress_interactive_output(suppress_interactive_output);
    params.validate()?;

    let controller = default_controller(HttpClientConfig::default(), &ListingSelectors::default())?;
    let report = controller.run(&params).await?;
    Ok(report.dataset)
}

/// Holds the dataset of the most recent crawl
#[derive(Debug, Clone, Default)]
pub struct AnimeListScraper {
    pub dataset: Dataset,
}

impl AnimeListScraper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Crawl with default collaborators, replacing the held dataset
    pub async fn anime_scraper(
        &mut self,
        max_pages: u32,
        pause_seconds: f64,
        start_url: &str,
        suppress_interactive_output: bool,
    ) -> Result<&Dataset, CrawlError> {
        let params = CrawlParams::new(max_pages, pause_seconds, start_url)
            .with_suppress_interactive_output(suppress_interactive_output);
        params.validate()?;

        let controller = default_controller(HttpClientConfig::default(), &ListingSelectors::default())?;
        self.run_with(&controller, &params).await?;
        Ok(&self.dataset)
    }

    /// Crawl through a caller-built controller, replacing the held dataset
    pub async fn run_with<F, O, P>(
        &mut self,
        controller: &PaginationController<F, O, P>,
        params: &CrawlParams,
    ) -> Result<CrawlReport, CrawlError>
    where
        F: PageFetcher,
        O: CrawlObserver,
        P: Pacer,
    {
        let report = controller.run(params).await?;
        self.dataset = report.dataset.clone();
        Ok(report)
    }

    /// Write the held dataset as CSV
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SinkError> {
        self.dataset.write_csv(path)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_client_setup_failure_keeps_its_source() {
        let http = HttpClientConfig {
            user_agent: "bad\nagent".to_string(),
            ..Default::default()
        };
        let err = default_controller(http, &ListingSelectors::default()).err().unwrap();

        assert!(matches!(err, CrawlError::ClientSetup(_)));
        let source = err.source().unwrap();
        assert!(source.to_string().starts_with("Invalid user agent"));
        assert!(source.source().is_some());
    }
}
