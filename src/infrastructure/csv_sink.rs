//! CSV persistence for harvested and cleaned datasets
//!
//! Column names and order follow [`DATASET_COLUMNS`]. Absent values are
//! written as empty cells and unknown episode counts as `-500`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::cleaning::{CleanRecord, DataCleaning};
use crate::domain::dataset::Dataset;
use crate::domain::errors::SinkError;
use crate::domain::item_record::{DATASET_COLUMNS, ItemRecord};
use crate::domain::services::DatasetSink;

/// Buffers appended records and writes them to one CSV file on `persist`
#[derive(Debug, Clone)]
pub struct CsvDatasetSink {
    path: PathBuf,
    records: Vec<ItemRecord>,
}

impl CsvDatasetSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records buffered so far
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl DatasetSink for CsvDatasetSink {
    fn append(&mut self, record: &ItemRecord) -> Result<(), SinkError> {
        self.records.push(record.clone());
        Ok(())
    }

    fn persist(&mut self) -> Result<(), SinkError> {
        write_rows(&self.path, &self.records)?;
        info!("Wrote {} records to {:?}", self.records.len(), self.path);
        Ok(())
    }
}

impl Dataset {
    /// Write every record, header first, in insertion order
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<(), SinkError> {
        let mut sink = CsvDatasetSink::new(path.as_ref());
        for record in self {
            sink.append(record)?;
        }
        sink.persist()
    }

    /// Read a dataset written by [`write_csv`](Self::write_csv).
    ///
    /// Columns are matched by name, so a leading unnamed index column (as
    /// written by dataframe tools) is ignored.
    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref();
        let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

        let records = reader
            .deserialize::<ItemRecord>()
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Read {} records from {:?}", records.len(), path);
        Ok(Self::from(records))
    }
}

/// Persist cleaned rows with the same column layout as the raw dataset
pub fn write_clean_csv(path: impl AsRef<Path>, records: &[CleanRecord]) -> Result<(), SinkError> {
    let path = path.as_ref();
    write_rows(path, records)?;
    info!("Wrote {} cleaned records to {:?}", records.len(), path);
    Ok(())
}

impl DataCleaning {
    /// Persist the cleaned table
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<(), SinkError> {
        write_clean_csv(path, self.records())
    }
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), SinkError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    // Header written explicitly so an empty dataset still gets one
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(File::create(path)?));

    writer.write_record(DATASET_COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }

    let mut inner = writer.into_inner().map_err(|e| SinkError::Io(e.into_error()))?;
    inner.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item_record::EpisodeCount;
    use tempfile::TempDir;

    fn record(name: Option<&str>, episodes: EpisodeCount) -> ItemRecord {
        ItemRecord {
            name: name.map(str::to_string),
            score: Some("8.78".to_string()),
            popularity: 1_024,
            season_start: "Oct".to_string(),
            year_start: 2011,
            season_end: "Mar".to_string(),
            year_end: 2012,
            num_episodes: episodes,
            category: "TV".to_string(),
        }
    }

    #[test]
    fn test_header_and_legacy_unknown_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("anime_dataset.csv");

        let dataset = Dataset::from(vec![
            record(Some("Steins;Gate"), EpisodeCount::Known(24)),
            record(None, EpisodeCount::Unknown),
        ]);
        dataset.write_csv(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "anime,score,popularity,season_start,year_start,season_end,year_end,num_episodes,anime_type"
        );
        assert_eq!(lines[1], "Steins;Gate,8.78,1024,Oct,2011,Mar,2012,24,TV");
        assert_eq!(lines[2], ",8.78,1024,Oct,2011,Mar,2012,-500,TV");
    }

    #[test]
    fn test_empty_dataset_still_has_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");

        Dataset::new().write_csv(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_read_back_preserves_order_and_unknowns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("anime_dataset.csv");

        let dataset = Dataset::from(vec![
            record(Some("Gintama"), EpisodeCount::Known(51)),
            record(Some("One Piece"), EpisodeCount::Unknown),
        ]);
        dataset.write_csv(&path).unwrap();

        assert_eq!(Dataset::read_csv(&path).unwrap(), dataset);
    }

    #[test]
    fn test_read_ignores_leading_index_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("indexed.csv");
        fs::write(
            &path,
            ",anime,score,popularity,season_start,year_start,season_end,year_end,num_episodes,anime_type\n\
             0,Monster,8.88,1000,Apr,2004,Sep,2005,74,TV\n\
             1,Frieren,9.30,900,Sep,2023,Mar,2024,-500,TV\n",
        )
        .unwrap();

        let dataset = Dataset::read_csv(&path).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].name.as_deref(), Some("Monster"));
        assert_eq!(dataset.records()[1].num_episodes, EpisodeCount::Unknown);
    }

    #[test]
    fn test_cleaned_rows_use_numeric_months() {
        use crate::domain::cleaning::MonthMapping;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clean.csv");

        let dataset = Dataset::from(vec![
            record(Some("Mushishi"), EpisodeCount::Known(26)),
            record(Some("Berserk"), EpisodeCount::Unknown),
        ]);
        let mut cleaning = DataCleaning::from_dataset(&dataset);
        cleaning.replace_months(&MonthMapping::english_abbreviations());
        assert_eq!(cleaning.replace_drop_missing(), 1);
        cleaning.write_csv(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "Mushishi,8.78,1024,10,2011,3,2012,26,TV");
    }

    #[test]
    fn test_sink_buffers_until_persist() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sink.csv");

        let mut sink = CsvDatasetSink::new(&path);
        sink.append(&record(Some("Clannad"), EpisodeCount::Known(24))).unwrap();
        assert_eq!(sink.len(), 1);
        assert!(!path.exists());

        sink.persist().unwrap();
        assert!(path.exists());
    }
}
