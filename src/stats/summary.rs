use serde::Serialize;

use crate::core::{
    indices::{LocationCount, LocationTally},
    store::DiveLog,
};

/// How many locations [`DiveLog::summary`] ranks.
pub const DEFAULT_TOP_LOCATIONS: usize = 5;

/// Shown when no location can be named.
pub const NO_LOCATION: &str = "-";

/// Aggregates derived from a log's current records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Number of records.
    pub total_dives: usize,
    /// Sum of dive durations; 0 for an empty log.
    pub total_duration_min: u64,
    /// `None` for an empty log.
    pub average_depth_m: Option<f64>,
    /// `None` for an empty log.
    pub deepest_m: Option<f64>,
    /// Most frequent non-blank location, or [`NO_LOCATION`].
    pub favorite_location: String,
    /// Most frequent non-blank locations, count descending.
    pub top_locations: Vec<LocationCount>,
}

impl Summary {
    /// Aggregates `log`, ranking at most `top_n` locations.
    pub fn compute(log: &DiveLog, top_n: usize) -> Self {
        let total_dives = log.len();
        let total_duration_min = log.iter().map(|r| u64::from(r.duration_min)).sum();

        let (average_depth_m, deepest_m) = if log.is_empty() {
            (None, None)
        } else {
            let sum: f64 = log.iter().map(|r| r.depth_m).sum();
            let max = log.iter().map(|r| r.depth_m).fold(0.0_f64, f64::max);
            (Some(sum / total_dives as f64), Some(max))
        };

        let tally = LocationTally::from_records(log);
        let favorite_location = tally.mode().unwrap_or(NO_LOCATION).to_string();

        Self {
            total_dives,
            total_duration_min,
            average_depth_m,
            deepest_m,
            favorite_location,
            top_locations: tally.top(top_n),
        }
    }
}
