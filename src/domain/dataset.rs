//! Ordered, append-only collection of extracted records

use serde::{Deserialize, Serialize};

use super::item_record::ItemRecord;

/// Records accumulated over a crawl, in page order then in-page row order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    records: Vec<ItemRecord>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ItemRecord) {
        self.records.push(record);
    }

    pub fn extend<I: IntoIterator<Item = ItemRecord>>(&mut self, records: I) {
        self.records.extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ItemRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ItemRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<ItemRecord> {
        self.records
    }
}

impl From<Vec<ItemRecord>> for Dataset {
    fn from(records: Vec<ItemRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<ItemRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = ItemRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Dataset {
    type Item = ItemRecord;
    type IntoIter = std::vec::IntoIter<ItemRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a ItemRecord;
    type IntoIter = std::slice::Iter<'a, ItemRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
