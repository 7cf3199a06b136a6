//! Post-crawl cleaning of a harvested dataset
//!
//! Converts raw records into typed rows, maps month tokens to numbers and
//! drops incomplete rows. Operates only on a finished [`Dataset`].

use serde::{Serialize, Serializer};
use std::collections::HashMap;

use super::dataset::Dataset;
use super::item_record::{DATASET_COLUMNS, ItemRecord};

/// Month value of a cleaned row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeasonField {
    /// Raw token, not mapped yet
    Token(String),
    /// Numeric month after [`DataCleaning::replace_months`]
    Month(u32),
    Missing,
}

impl SeasonField {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn month(&self) -> Option<u32> {
        match self {
            Self::Month(m) => Some(*m),
            _ => None,
        }
    }
}

impl Serialize for SeasonField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Token(t) => serializer.serialize_str(t),
            Self::Month(m) => serializer.serialize_u32(*m),
            Self::Missing => serializer.serialize_none(),
        }
    }
}

/// Typed row produced by cleaning. Column names match the raw dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanRecord {
    #[serde(rename = "anime")]
    pub name: Option<String>,
    pub score: Option<f64>,
    pub popularity: i64,
    pub season_start: SeasonField,
    pub year_start: i32,
    pub season_end: SeasonField,
    pub year_end: i32,
    pub num_episodes: Option<u32>,
    #[serde(rename = "anime_type")]
    pub category: String,
}

impl CleanRecord {
    fn from_item(record: &ItemRecord) -> Self {
        Self {
            name: record.name.clone(),
            score: record.numeric_score(),
            popularity: record.popularity,
            season_start: SeasonField::Token(record.season_start.clone()),
            year_start: record.year_start,
            season_end: SeasonField::Token(record.season_end.clone()),
            year_end: record.year_end,
            num_episodes: record.num_episodes.known(),
            category: record.category.clone(),
        }
    }

    fn is_complete(&self) -> bool {
        self.name.is_some()
            && self.score.is_some()
            && self.num_episodes.is_some()
            && !self.season_start.is_missing()
            && !self.season_end.is_missing()
    }
}

/// Caller-supplied month token → month number table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthMapping(HashMap<String, u32>);

impl MonthMapping {
    pub fn new(map: HashMap<String, u32>) -> Self {
        Self(map)
    }

    /// `Jan` → 1 … `Dec` → 12
    pub fn english_abbreviations() -> Self {
        const MONTHS: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        Self(
            MONTHS
                .iter()
                .zip(1u32..)
                .map(|(name, n)| ((*name).to_string(), n))
                .collect(),
        )
    }

    pub fn insert(&mut self, token: impl Into<String>, month: u32) {
        self.0.insert(token.into(), month);
    }

    pub fn get(&self, token: &str) -> Option<u32> {
        self.0.get(token).copied()
    }
}

/// Missing-value count per column, in dataset column order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingValueCounts(Vec<(&'static str, usize)>);

impl MissingValueCounts {
    pub fn get(&self, column: &str) -> Option<usize> {
        self.0.iter().find(|(c, _)| *c == column).map(|(_, n)| *n)
    }

    pub fn total(&self) -> usize {
        self.0.iter().map(|(_, n)| n).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        self.0.iter().copied()
    }
}

/// Cleaning pipeline over a harvested dataset
#[derive(Debug, Clone)]
pub struct DataCleaning {
    records: Vec<CleanRecord>,
}

impl DataCleaning {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            records: dataset.iter().map(CleanRecord::from_item).collect(),
        }
    }

    /// Drop every row that has any missing value. Returns the number dropped.
    pub fn replace_drop_missing(&mut self) -> usize {
        let before = self.records.len();
        self.records.retain(CleanRecord::is_complete);
        before - self.records.len()
    }

    /// Replace raw month tokens with numbers. Tokens absent from `mapping`
    /// become missing.
    pub fn replace_months(&mut self, mapping: &MonthMapping) {
        let map_field = |field: &mut SeasonField| {
            if let SeasonField::Token(token) = field {
                *field = mapping
                    .get(token)
                    .map_or(SeasonField::Missing, SeasonField::Month);
            }
        };

        for record in &mut self.records {
            map_field(&mut record.season_start);
            map_field(&mut record.season_end);
        }
    }

    pub fn missing_value_counts(&self) -> MissingValueCounts {
        let count = |pred: fn(&CleanRecord) -> bool| self.records.iter().filter(|r| pred(r)).count();

        let counts = DATASET_COLUMNS
            .iter()
            .map(|column| {
                let n = match *column {
                    "anime" => count(|r| r.name.is_none()),
                    "score" => count(|r| r.score.is_none()),
                    "season_start" => count(|r| r.season_start.is_missing()),
                    "season_end" => count(|r| r.season_end.is_missing()),
                    "num_episodes" => count(|r| r.num_episodes.is_none()),
                    _ => 0,
                };
                (*column, n)
            })
            .collect();

        MissingValueCounts(counts)
    }

    pub fn records(&self) -> &[CleanRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<CleanRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item_record::EpisodeCount;

    fn record(name: Option<&str>, score: &str, episodes: EpisodeCount, start: &str) -> ItemRecord {
        ItemRecord {
            name: name.map(str::to_string),
            score: Some(score.to_string()),
            popularity: 10_000,
            season_start: start.to_string(),
            year_start: 2015,
            season_end: "Dec".to_string(),
            year_end: 2015,
            num_episodes: episodes,
            category: "TV".to_string(),
        }
    }

    fn dataset() -> Dataset {
        Dataset::from(vec![
            record(Some("Complete"), "8.12", EpisodeCount::Known(12), "Oct"),
            record(Some("Airing"), "7.90", EpisodeCount::Unknown, "Apr"),
            record(None, "7.00", EpisodeCount::Known(1), "Jan"),
            record(Some("Unscored"), "N/A", EpisodeCount::Known(26), "Jul"),
            record(Some("Odd month"), "6.50", EpisodeCount::Known(3), "2015"),
        ])
    }

    #[test]
    fn test_missing_value_counts_before_cleaning() {
        let cleaning = DataCleaning::from_dataset(&dataset());
        let counts = cleaning.missing_value_counts();

        assert_eq!(counts.get("anime"), Some(1));
        assert_eq!(counts.get("score"), Some(1));
        assert_eq!(counts.get("num_episodes"), Some(1));
        assert_eq!(counts.get("season_start"), Some(0));
        assert_eq!(counts.get("popularity"), Some(0));
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_replace_months_then_drop() {
        let mut cleaning = DataCleaning::from_dataset(&dataset());
        cleaning.replace_months(&MonthMapping::english_abbreviations());

        assert_eq!(cleaning.missing_value_counts().get("season_start"), Some(1));

        let dropped = cleaning.replace_drop_missing();
        assert_eq!(dropped, 4);
        assert_eq!(cleaning.len(), 1);

        let kept = &cleaning.records()[0];
        assert_eq!(kept.name.as_deref(), Some("Complete"));
        assert_eq!(kept.season_start.month(), Some(10));
        assert_eq!(kept.season_end.month(), Some(12));
        assert_eq!(kept.num_episodes, Some(12));
    }

    #[test]
    fn test_custom_mapping() {
        let mut mapping = MonthMapping::default();
        mapping.insert("Oct", 10);

        let mut cleaning = DataCleaning::from_dataset(&dataset());
        cleaning.replace_months(&mapping);

        assert_eq!(cleaning.records()[0].season_start, SeasonField::Month(10));
        assert_eq!(cleaning.records()[1].season_start, SeasonField::Missing);
    }
}
