//! Errors that abort a crawl
//!
//! Anything that goes wrong after the first page has been processed ends
//! the crawl normally with a [`TerminationReason`](crate::domain::TerminationReason)
//! instead of one of these.

use thiserror::Error;

use crate::domain::errors::{ClientSetupError, FetchError};
use crate::infrastructure::parsing::ParsingError;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("Invalid crawl parameters: {0}")]
    InvalidParameters(String),

    #[error("Start page could not be fetched: {url}")]
    StartPageUnreachable {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("Start page could not be parsed: {url}")]
    StartPageUnparseable {
        url: String,
        #[source]
        source: ParsingError,
    },

    #[error("Invalid listing selectors: {0}")]
    Selector(#[source] ParsingError),

    #[error("HTTP client setup failed")]
    ClientSetup(#[from] ClientSetupError),
}

impl CrawlError {
    /// True when the crawl never reached a first page
    pub fn is_start_page_failure(&self) -> bool {
        matches!(self, Self::StartPageUnreachable { .. } | Self::StartPageUnparseable { .. })
    }
}
