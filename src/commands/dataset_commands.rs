//! Post-crawl commands over a saved dataset: cleaning, ranking, summaries

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::domain::cleaning::{DataCleaning, MissingValueCounts, MonthMapping};
use crate::domain::dataset::Dataset;
use crate::domain::examine::{RatioEntry, RatioQuery, YearSummary, score_popularity_ratio_ranking, yearly_category_summary};

#[derive(Debug, Clone, Serialize)]
pub struct CleanSummary {
    pub input_rows: usize,
    /// Missing values per column after month mapping, before dropping rows
    pub missing: Vec<(String, usize)>,
    pub dropped_rows: usize,
    pub remaining_rows: usize,
}

impl CleanSummary {
    fn new(input_rows: usize, missing: &MissingValueCounts, dropped_rows: usize) -> Self {
        Self {
            input_rows,
            missing: missing.iter().map(|(c, n)| (c.to_string(), n)).collect(),
            dropped_rows,
            remaining_rows: input_rows - dropped_rows,
        }
    }
}

fn read_dataset(input: &Path) -> Result<Dataset> {
    Dataset::read_csv(input).with_context(|| format!("Failed to read dataset from {:?}", input))
}

/// Map months, drop incomplete rows and write the result
pub fn clean_dataset(input: &Path, output: &Path, months: &MonthMapping) -> Result<CleanSummary> {
    let dataset = read_dataset(input)?;

    let mut cleaning = DataCleaning::from_dataset(&dataset);
    cleaning.replace_months(months);
    let missing = cleaning.missing_value_counts();
    let dropped = cleaning.replace_drop_missing();

    cleaning
        .write_csv(output)
        .with_context(|| format!("Failed to write cleaned dataset to {:?}", output))?;

    info!("Cleaned {} rows, dropped {}", dataset.len(), dropped);
    Ok(CleanSummary::new(dataset.len(), &missing, dropped))
}

fn cleaned(input: &Path) -> Result<DataCleaning> {
    let dataset = read_dataset(input)?;
    let mut cleaning = DataCleaning::from_dataset(&dataset);
    cleaning.replace_months(&MonthMapping::english_abbreviations());
    cleaning.replace_drop_missing();
    Ok(cleaning)
}

/// Score / popularity disparity ranking over the complete rows of `input`
pub fn rank_dataset(input: &Path, query: RatioQuery) -> Result<Vec<RatioEntry>> {
    let cleaning = cleaned(input)?;
    Ok(score_popularity_ratio_ranking(cleaning.records(), query))
}

/// Per start-year aggregates of one content type
pub fn summarize_dataset(input: &Path, category: &str) -> Result<BTreeMap<i32, YearSummary>> {
    let cleaning = cleaned(input)?;
    Ok(yearly_category_summary(cleaning.records(), category))
}
