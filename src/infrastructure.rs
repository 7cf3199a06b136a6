//! Infrastructure layer for HTTP fetching, HTML parsing, persistence and configuration
//!
//! Concrete implementations of the domain capabilities plus the ambient
//! configuration and logging setup.

pub mod config;
pub mod csv_sink;
pub mod http_client;
pub mod logging;
pub mod parsing;
pub mod parsing_error;

// Re-export commonly used items
pub use self::config::{AppConfig, ConfigError, ConfigManager, CrawlConfig, LoggingConfig, OutputConfig};
pub use csv_sink::{CsvDatasetSink, write_clean_csv};
pub use http_client::{HttpClient, HttpClientConfig};
pub use logging::{get_log_directory, init_logging, init_logging_with_config, log_system_info};
pub use parsing::{
    CompiledSelectors, Extraction, ItemRecordExtractor, ListingPage, ListingSelectors, NextLink, PageExtraction,
    ParsingError, ParsingResult, SkipReason,
};
