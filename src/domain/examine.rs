//! Exploratory analytics over cleaned records (no plotting)

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::cleaning::CleanRecord;

/// Parameters of the score / popularity disparity ranking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioQuery {
    /// Used when `lowest` is set: only rows scoring below this are considered
    pub lower_threshold: f64,
    /// Used when `lowest` is unset: only rows scoring above this are considered
    pub upper_threshold: f64,
    pub rows: usize,
    pub lowest: bool,
}

impl Default for RatioQuery {
    fn default() -> Self {
        Self {
            lower_threshold: 8.0,
            upper_threshold: 8.5,
            rows: 10,
            lowest: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatioEntry {
    pub name: Option<String>,
    pub score: f64,
    pub popularity: i64,
    pub score_popularity_ratio: f64,
}

/// Rank rows by `score / popularity`.
///
/// Rows without a score or with non-positive popularity are ignored. The result
/// is always in ascending ratio order; with `lowest` unset it holds the last
/// `rows` entries of that order.
pub fn score_popularity_ratio_ranking(records: &[CleanRecord], query: RatioQuery) -> Vec<RatioEntry> {
    let mut entries: Vec<RatioEntry> = records
        .iter()
        .filter(|r| r.popularity > 0)
        .filter_map(|r| {
            let score = r.score?;
            let keep = if query.lowest {
                score < query.lower_threshold
            } else {
                score > query.upper_threshold
            };
            keep.then(|| RatioEntry {
                name: r.name.clone(),
                score,
                popularity: r.popularity,
                score_popularity_ratio: score / r.popularity as f64,
            })
        })
        .collect();

    entries.sort_by(|a, b| {
        a.score_popularity_ratio
            .partial_cmp(&b.score_popularity_ratio)
            .unwrap_or(Ordering::Equal)
    });

    if query.lowest {
        entries.truncate(query.rows);
    } else {
        let skip = entries.len().saturating_sub(query.rows);
        entries.drain(..skip);
    }
    entries
}

/// Per-year aggregate for one content type
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct YearSummary {
    pub count: usize,
    pub mean_score: Option<f64>,
    pub mean_popularity: f64,
    pub mean_episodes: Option<f64>,
}

/// Count and averages per start year for rows of `category`
pub fn yearly_category_summary(records: &[CleanRecord], category: &str) -> BTreeMap<i32, YearSummary> {
    let mut grouped: BTreeMap<i32, Vec<&CleanRecord>> = BTreeMap::new();
    for record in records.iter().filter(|r| r.category == category) {
        grouped.entry(record.year_start).or_default().push(record);
    }

    grouped
        .into_iter()
        .map(|(year, rows)| {
            let popularity_sum: i64 = rows.iter().map(|r| r.popularity).sum();
            let summary = YearSummary {
                count: rows.len(),
                mean_score: mean(rows.iter().filter_map(|r| r.score)),
                mean_popularity: popularity_sum as f64 / rows.len() as f64,
                mean_episodes: mean(rows.iter().filter_map(|r| r.num_episodes).map(f64::from)),
            };
            (year, summary)
        })
        .collect()
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}
