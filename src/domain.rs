//! Domain module - Core records and crawl semantics
//!
//! This module contains the extracted record types, the dataset they
//! accumulate into, the loop state of a crawl and the capabilities the
//! crawl loop depends on.
//!
//! Modern Rust module organization (Rust 2018+ style):
//! - Each module is its own file in the domain/ directory
//! - Public exports are defined here for convenience

pub mod cleaning;
pub mod crawl_state;
pub mod dataset;
pub mod errors;
pub mod examine;
pub mod item_record;
pub mod services;

// Re-export commonly used items for convenience
pub use cleaning::{CleanRecord, DataCleaning, MissingValueCounts, MonthMapping, SeasonField};
pub use crawl_state::{CrawlState, PageProgress, TerminationReason, check_crawl_preconditions};
pub use dataset::Dataset;
pub use errors::{ClientSetupError, FetchError, SinkError};
pub use examine::{RatioEntry, RatioQuery, YearSummary, score_popularity_ratio_ranking, yearly_category_summary};
pub use item_record::{DATASET_COLUMNS, EpisodeCount, ItemRecord, UNKNOWN_EPISODES_LEGACY_VALUE};
pub use services::{CrawlObserver, DatasetSink, NullObserver, Pacer, PageFetcher, TokioPacer, TracingObserver};
