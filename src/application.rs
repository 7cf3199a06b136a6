//! Application layer module
//!
//! This module contains the crawl use case: the pagination loop, its
//! parameters and report, and the convenience entry points built on it.

pub mod crawl_error;
pub mod pagination_controller;
pub mod scraper;

pub use crawl_error::CrawlError;
pub use pagination_controller::{CrawlParams, CrawlReport, PaginationController, resolve_next_url, site_root};
pub use scraper::{AnimeListScraper, DefaultController, default_controller, scrape};
