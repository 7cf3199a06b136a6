//! HTML parsing infrastructure for ranking list pages
//!
//! `scraper`-based implementation of the document queries the crawl loop
//! needs, plus the row-to-record extraction rules.

pub mod config;
pub mod error;
pub mod item_record_extractor;
pub mod listing_page;

// Re-export public types
pub use self::config::{CompiledSelectors, ListingSelectors};
pub use error::{ParsingError, ParsingResult};
pub use item_record_extractor::{
    EXPECTED_INFO_TOKENS, Extraction, ItemRecordExtractor, PageExtraction, SkipReason, parse_episode_count,
    parse_popularity,
};
pub use listing_page::{ListingPage, NextLink};
