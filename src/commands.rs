//! Command handlers behind the command-line interface
//!
//! Modern Rust module organization (Rust 2018+ style):
//! - Each command module is its own file in the commands/ directory
//! - Public exports are defined here for convenience

pub mod crawl_commands;
pub mod dataset_commands;

pub use crawl_commands::{CrawlRequest, CrawlSummary, apply_overrides, init_config, load_app_config, run_crawl};
pub use dataset_commands::{CleanSummary, clean_dataset, rank_dataset, summarize_dataset};
