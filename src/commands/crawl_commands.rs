//! Crawl and configuration commands
//!
//! Command-line requests are merged over the layered configuration, the
//! crawl is run through the production controller and the dataset is
//! written as CSV.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::application::{CrawlParams, CrawlReport, default_controller};
use crate::domain::crawl_state::TerminationReason;
use crate::domain::services::DatasetSink;
use crate::infrastructure::config::{AppConfig, ConfigManager};
use crate::infrastructure::csv_sink::CsvDatasetSink;

/// Per-invocation overrides of the crawl configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrawlRequest {
    pub max_pages: Option<u32>,
    pub pause_seconds: Option<f64>,
    pub start_url: Option<String>,
    pub output: Option<PathBuf>,
    /// Keep progress output instead of clearing it between pages
    pub no_clear: bool,
}

/// What a finished crawl reports back to the user
#[derive(Debug, Clone, Serialize)]
pub struct CrawlSummary {
    pub session_id: String,
    pub records: usize,
    pub pages_processed: u32,
    pub request_count: u32,
    pub rows_skipped: usize,
    pub termination: TerminationReason,
    pub output_path: PathBuf,
    pub elapsed_seconds: f64,
}

impl CrawlSummary {
    fn from_report(report: &CrawlReport, output_path: &Path) -> Self {
        Self {
            session_id: report.session_id.to_string(),
            records: report.dataset.len(),
            pages_processed: report.pages_processed,
            request_count: report.request_count,
            rows_skipped: report.rows_skipped,
            termination: report.termination.clone(),
            output_path: output_path.to_path_buf(),
            elapsed_seconds: report.elapsed.as_secs_f64(),
        }
    }
}

/// Load configuration from an explicit file, or from the user config
/// directory when none is given. Missing files fall back to defaults.
pub fn load_app_config(config_path: Option<&Path>) -> Result<AppConfig> {
    let manager = match config_path {
        Some(path) => ConfigManager::with_path(path),
        None => match ConfigManager::new() {
            Ok(manager) => manager,
            Err(e) => {
                warn!("{}; using built-in defaults", e);
                return Ok(AppConfig::default());
            }
        },
    };

    manager
        .load_config()
        .with_context(|| format!("Failed to load configuration from {:?}", manager.config_path()))
}

/// Write the default configuration file if it does not exist yet
pub async fn init_config(config_path: Option<&Path>) -> Result<PathBuf> {
    let manager = match config_path {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    manager.initialize_on_first_run().await?;
    Ok(manager.config_path().to_path_buf())
}

/// Merge request overrides into `config`
pub fn apply_overrides(config: &mut AppConfig, request: &CrawlRequest) {
    if let Some(max_pages) = request.max_pages {
        config.crawl.max_pages = max_pages;
    }
    if let Some(pause_seconds) = request.pause_seconds {
        config.crawl.pause_seconds = pause_seconds;
    }
    if let Some(start_url) = &request.start_url {
        config.crawl.start_url.clone_from(start_url);
    }
    if let Some(output) = &request.output {
        config.output.dataset_path.clone_from(output);
    }
    if request.no_clear {
        config.crawl.suppress_interactive_output = false;
    }
}

/// Run a crawl with `config` and write the dataset to `config.output`
pub async fn run_crawl(config: &AppConfig) -> Result<CrawlSummary> {
    config.validate()?;

    let params = CrawlParams::from(&config.crawl);
    let controller = default_controller(config.http.clone(), &config.selectors)?;
    let report = controller.run(&params).await?;

    let output_path = &config.output.dataset_path;
    let mut sink = CsvDatasetSink::new(output_path);
    for record in &report.dataset {
        sink.append(record)?;
    }
    sink.persist()
        .with_context(|| format!("Failed to write dataset to {:?}", output_path))?;

    let summary = CrawlSummary::from_report(&report, output_path);
    info!(
        records = summary.records,
        pages = summary.pages_processed,
        "Dataset saved to {:?}",
        summary.output_path
    );
    Ok(summary)
}
