//! Dive-computer depth profile parsing.
//!
//! Input is CSV with `Time` and `Depth` columns; other columns are ignored.
//! `Time` is either a plain number or a clock value (`MM:SS`, `HH:MM:SS`)
//! converted to seconds.

use std::io::Read;

use serde::Serialize;
use thiserror::Error;

use crate::types::AxisOrientation;

const TIME: &str = "Time";
const DEPTH: &str = "Depth";

/// Errors produced while reading a profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// One or both required columns are absent.
    #[error("profile CSV must contain 'Time' and 'Depth' columns (missing: {})", .missing.join(", "))]
    MissingColumns {
        /// Names of the absent columns.
        missing: Vec<&'static str>,
    },
    /// A cell could not be read as a number.
    #[error("row {row}: invalid {column} value `{value}`")]
    InvalidValue {
        /// 1-based data row.
        row: usize,
        /// Column name.
        column: &'static str,
        /// Raw cell text.
        value: String,
    },
    /// Malformed CSV or read failure.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// One depth sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfilePoint {
    /// Sample time as given, or seconds for clock values.
    pub time: f64,
    /// Depth in meters.
    pub depth: f64,
}

/// Depth samples sorted ascending by time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DepthProfile {
    /// Samples, ascending by time.
    pub points: Vec<ProfilePoint>,
}

impl DepthProfile {
    /// Depth is drawn growing downward.
    pub const DEPTH_AXIS: AxisOrientation = AxisOrientation::Downward;

    /// Reads a profile from CSV, failing when `Time` or `Depth` is missing.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self, ProfileError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let time_idx = headers.iter().position(|h| h == TIME);
        let depth_idx = headers.iter().position(|h| h == DEPTH);

        let (time_idx, depth_idx) = match (time_idx, depth_idx) {
            (Some(t), Some(d)) => (t, d),
            (t, d) => {
                let mut missing = Vec::new();
                if t.is_none() {
                    missing.push(TIME);
                }
                if d.is_none() {
                    missing.push(DEPTH);
                }
                return Err(ProfileError::MissingColumns { missing });
            }
        };

        let mut points = Vec::new();
        for (i, rec) in rdr.records().enumerate() {
            let rec = rec?;
            let row = i + 1;
            let time_raw = rec.get(time_idx).unwrap_or_default();
            let depth_raw = rec.get(depth_idx).unwrap_or_default();

            let time = parse_time(time_raw).ok_or_else(|| ProfileError::InvalidValue {
                row,
                column: TIME,
                value: time_raw.to_string(),
            })?;
            let depth = depth_raw
                .parse::<f64>()
                .ok()
                .filter(|d| d.is_finite())
                .ok_or_else(|| ProfileError::InvalidValue {
                    row,
                    column: DEPTH,
                    value: depth_raw.to_string(),
                })?;

            points.push(ProfilePoint { time, depth });
        }

        points.sort_by(|a, b| a.time.total_cmp(&b.time));
        Ok(Self { points })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when there are no samples.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Deepest sample, `None` when empty.
    pub fn max_depth(&self) -> Option<f64> {
        self.points.iter().map(|p| p.depth).reduce(f64::max)
    }

    /// Time between first and last sample, `None` when empty.
    pub fn elapsed(&self) -> Option<f64> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some(last.time - first.time),
            _ => None,
        }
    }
}

fn parse_time(raw: &str) -> Option<f64> {
    if let Ok(v) = raw.parse::<f64>() {
        return v.is_finite().then_some(v);
    }

    let parts: Vec<&str> = raw.split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return None;
    }
    let mut secs = 0.0;
    for part in parts {
        let v: f64 = part.parse().ok()?;
        if !v.is_finite() || v < 0.0 {
            return None;
        }
        secs = secs * 60.0 + v;
    }
    Some(secs)
}
