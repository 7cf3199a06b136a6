//! Command-line entry point

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use anime_rank_harvester::commands::{
    CrawlRequest, apply_overrides, clean_dataset, init_config, load_app_config, rank_dataset, run_crawl,
    summarize_dataset,
};
use anime_rank_harvester::domain::{MonthMapping, RatioQuery};
use anime_rank_harvester::infrastructure::logging::{init_logging_with_config, log_system_info};

#[derive(Debug, Parser)]
#[command(name = "anime-rank-harvester", version, about = "Harvest a paginated anime ranking list into CSV")]
struct Cli {
    /// Config file (JSON, TOML or YAML). Defaults to the user config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Crawl the ranking list and write the dataset
    Crawl(CrawlArgs),
    /// Drop incomplete rows and map month names to numbers
    Clean {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Rank entries by score / popularity
    Rank(RankArgs),
    /// Per-year averages for one content type
    Summary {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = "TV")]
        category: String,
    },
    /// Write the default config file if none exists
    InitConfig,
}

#[derive(Debug, Args)]
struct CrawlArgs {
    #[arg(long)]
    max_pages: Option<u32>,
    /// Seconds to wait before each page after the first
    #[arg(long = "pause")]
    pause_seconds: Option<f64>,
    #[arg(long)]
    start_url: Option<String>,
    #[arg(long)]
    output: Option<PathBuf>,
    /// Keep progress output between pages
    #[arg(long)]
    no_clear: bool,
}

#[derive(Debug, Args)]
struct RankArgs {
    #[arg(long)]
    input: PathBuf,
    #[arg(long, default_value_t = 8.0)]
    lower: f64,
    #[arg(long, default_value_t = 8.5)]
    upper: f64,
    #[arg(long, default_value_t = 10)]
    rows: usize,
    /// Rank entries above the upper threshold instead of below the lower one
    #[arg(long)]
    highest: bool,
}

impl From<CrawlArgs> for CrawlRequest {
    fn from(args: CrawlArgs) -> Self {
        Self {
            max_pages: args.max_pages,
            pause_seconds: args.pause_seconds,
            start_url: args.start_url,
            output: args.output,
            no_clear: args.no_clear,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_app_config(cli.config.as_deref())?;

    init_logging_with_config(config.logging.clone())?;
    log_system_info();

    match cli.command {
        Command::Crawl(args) => {
            apply_overrides(&mut config, &CrawlRequest::from(args));
            let summary = run_crawl(&config).await?;
            println!("{}", summary.termination);
            println!(
                "{} records from {} pages written to {}",
                summary.records,
                summary.pages_processed,
                summary.output_path.display()
            );
        }
        Command::Clean { input, output } => {
            let summary = clean_dataset(&input, &output, &MonthMapping::english_abbreviations())?;
            for (column, missing) in &summary.missing {
                println!("{column:<14}{missing}");
            }
            println!(
                "dropped {} of {} rows, {} written to {}",
                summary.dropped_rows,
                summary.input_rows,
                summary.remaining_rows,
                output.display()
            );
        }
        Command::Rank(args) => {
            let query = RatioQuery {
                lower_threshold: args.lower,
                upper_threshold: args.upper,
                rows: args.rows,
                lowest: !args.highest,
            };
            for entry in rank_dataset(&args.input, query)? {
                println!(
                    "{:<50} {:>5.2} {:>10} {:.3e}",
                    entry.name.as_deref().unwrap_or("-"),
                    entry.score,
                    entry.popularity,
                    entry.score_popularity_ratio
                );
            }
        }
        Command::Summary { input, category } => {
            for (year, summary) in summarize_dataset(&input, &category)? {
                println!(
                    "{year} count={} score={} popularity={:.0} episodes={}",
                    summary.count,
                    summary.mean_score.map_or_else(|| "-".to_string(), |s| format!("{s:.2}")),
                    summary.mean_popularity,
                    summary.mean_episodes.map_or_else(|| "-".to_string(), |e| format!("{e:.1}")),
                );
            }
        }
        Command::InitConfig => {
            let path = init_config(cli.config.as_deref()).await?;
            info!("Configuration ready at {:?}", path);
            println!("{}", path.display());
        }
    }

    Ok(())
}
