use thiserror::Error;

use crate::{
    dive::{DiveDraft, DiveRecord, RecordError},
    stats::summary::{DEFAULT_TOP_LOCATIONS, Summary},
    types::DiveIndex,
};

use super::{
    indices::{LocationCount, LocationTally},
    table::TableRow,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("index {index} out of range for log of {len} dives")]
    IndexOutOfRange { index: DiveIndex, len: usize },
    #[error("invalid dive record: {0}")]
    InvalidRecord(#[from] RecordError),
}

/// Ordered, session-owned collection of dive records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiveLog {
    records: Vec<DiveRecord>,
}

impl DiveLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `draft` and appends it, returning the new record's index.
    pub fn append(&mut self, draft: DiveDraft) -> Result<DiveIndex, StoreError> {
        let rec = DiveRecord::try_from(draft)?;
        self.records.push(rec);
        Ok(self.records.len() - 1)
    }

    /// Removes the record at `index`; later records shift down by one.
    pub fn delete_at(&mut self, index: DiveIndex) -> Result<DiveRecord, StoreError> {
        if index >= self.records.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.records.len(),
            });
        }
        Ok(self.records.remove(index))
    }

    /// Appends every record of `other`, preserving its order.
    pub fn merge(&mut self, other: DiveLog) {
        self.records.extend(other.records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: DiveIndex) -> Option<&DiveRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[DiveRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiveRecord> {
        self.records.iter()
    }

    pub fn summary(&self) -> Summary {
        Summary::compute(self, DEFAULT_TOP_LOCATIONS)
    }

    pub fn top_locations(&self, n: usize) -> Vec<LocationCount> {
        LocationTally::from_records(&self.records).top(n)
    }

    /// Records sorted ascending by date without touching stored order.
    ///
    /// The sort is stable; undated records follow all dated ones.
    pub fn chronological(&self) -> Vec<&DiveRecord> {
        let mut out: Vec<&DiveRecord> = self.records.iter().collect();
        out.sort_by(|a, b| match (a.date, b.date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        out
    }

    pub fn chronological_cloned(&self) -> Vec<DiveRecord> {
        self.chronological().into_iter().cloned().collect()
    }

    /// Display projection; with `include_image` false the image column is
    /// absent from every row.
    pub fn as_table(&self, include_image: bool) -> Vec<TableRow> {
        self.records
            .iter()
            .map(|rec| TableRow::project(rec, include_image))
            .collect()
    }
}

impl<'a> IntoIterator for &'a DiveLog {
    type Item = &'a DiveRecord;
    type IntoIter = std::slice::Iter<'a, DiveRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
