//! Anime Rank Harvester - paginated ranking list crawler
//!
//! Walks a ranking list page by page, extracts one record per well-formed
//! entry row and accumulates them into a [`Dataset`](domain::Dataset) that
//! can be written as CSV, cleaned and examined.

// Module declarations
pub mod application;
pub mod commands;
pub mod domain;
pub mod infrastructure;

pub use application::{AnimeListScraper, CrawlError, CrawlParams, CrawlReport, PaginationController, scrape};
pub use domain::{Dataset, EpisodeCount, ItemRecord, TerminationReason};
