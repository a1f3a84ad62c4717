use hashbrown::HashMap;
use serde::Serialize;

use crate::dive::DiveRecord;

/// One ranked location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationCount {
    /// Location text as entered.
    pub location: String,
    /// Dives logged there.
    pub count: usize,
}

/// Per-location dive counts remembering first-seen order.
///
/// Ranking is by count descending, then by first appearance, so the mode
/// never depends on hash iteration order.
#[derive(Debug, Default)]
pub struct LocationTally<'a> {
    counts: HashMap<&'a str, (usize, usize)>,
}

impl<'a> LocationTally<'a> {
    pub fn from_records(records: impl IntoIterator<Item = &'a DiveRecord>) -> Self {
        let mut tally = Self::default();
        for rec in records {
            tally.add(&rec.location);
        }
        tally
    }

    /// Counts `location`; blank locations are ignored.
    pub fn add(&mut self, location: &'a str) {
        if location.trim().is_empty() {
            return;
        }
        let next_seen = self.counts.len();
        self.counts.entry(location).or_insert((0, next_seen)).0 += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn ranked(&self) -> Vec<LocationCount> {
        let mut entries: Vec<(&str, usize, usize)> = self
            .counts
            .iter()
            .map(|(loc, (count, first))| (*loc, *count, *first))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        entries
            .into_iter()
            .map(|(location, count, _)| LocationCount {
                location: location.to_string(),
                count,
            })
            .collect()
    }

    pub fn top(&self, n: usize) -> Vec<LocationCount> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }

    /// Most frequent location, first-seen on tie.
    pub fn mode(&self) -> Option<&'a str> {
        self.counts
            .iter()
            .min_by(|a, b| (b.1.0).cmp(&a.1.0).then((a.1.1).cmp(&b.1.1)))
            .map(|(loc, _)| *loc)
    }
}
