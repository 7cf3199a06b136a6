//! Error types at the collaborator boundaries (page fetching, dataset sinks)

use thiserror::Error;

/// Failure of a single page fetch.
///
/// The crawl loop never inspects the variant to decide what to do; it only
/// distinguishes "first page" from "next page". The variants exist for logs.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid request URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP request failed: {url}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request failed with status {status}: {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to read response body from: {url}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Empty response body from: {url}")]
    EmptyBody { url: String },
}

impl FetchError {
    /// URL of the failed request
    pub fn url(&self) -> &str {
        match self {
            Self::InvalidUrl { url, .. }
            | Self::Request { url, .. }
            | Self::HttpStatus { url, .. }
            | Self::Body { url, .. }
            | Self::EmptyBody { url } => url,
        }
    }
}

/// The HTTP client could not be built from its configuration
#[derive(Error, Debug)]
pub enum ClientSetupError {
    #[error("Invalid user agent: {0}")]
    UserAgent(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Failed to create HTTP client")]
    Build(#[source] reqwest::Error),
}

/// Failure while writing the dataset to durable storage
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Dataset file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),
}
