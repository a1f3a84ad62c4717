//! Dive domain record and draft types.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    photo::Photo,
    types::{Activity, Coordinates, TankType},
};

/// Reasons a draft cannot become a record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    /// Depth must be finite and non-negative.
    #[error("invalid depth {0} m: must be finite and non-negative")]
    InvalidDepth(f64),
    /// Coordinates must be finite and within range.
    #[error("invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinates {
        /// Offending latitude.
        latitude: f64,
        /// Offending longitude.
        longitude: f64,
    },
}

/// One logged dive, immutable once appended to a log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiveRecord {
    /// Calendar date of the dive; imported rows may lack one.
    pub date: Option<NaiveDate>,
    /// Diver name.
    pub diver: String,
    /// Free-text site name, used as a grouping key.
    pub location: String,
    /// Site position, [`Coordinates::SENTINEL`] when unresolved.
    pub coordinates: Coordinates,
    /// True only when the location was resolved by a geocoder.
    pub location_verified: bool,
    /// Entry time.
    #[serde(with = "hhmm")]
    pub start_time: Option<NaiveTime>,
    /// Exit time.
    #[serde(with = "hhmm")]
    pub end_time: Option<NaiveTime>,
    /// Maximum depth in meters.
    pub depth_m: f64,
    /// Dive time in minutes.
    pub duration_min: u32,
    /// Dive activity.
    pub activity: Activity,
    /// Buddy name.
    pub buddy: String,
    /// Free-form notes.
    pub notes: String,
    /// Equipment used.
    pub equipment: String,
    /// Breathing gas.
    pub tank_type: TankType,
    /// Tank pressure before the dive, in bar.
    pub air_before_bar: u32,
    /// Tank pressure after the dive, in bar.
    pub air_after_bar: u32,
    /// Site photo; never exported.
    #[serde(skip)]
    pub photo: Option<Photo>,
}

impl DiveRecord {
    /// Air consumed in bar; an overpressure reading clamps to zero.
    pub fn air_used_bar(&self) -> u32 {
        self.air_before_bar.saturating_sub(self.air_after_bar)
    }

    /// True when the location is empty or whitespace.
    pub fn has_blank_location(&self) -> bool {
        self.location.trim().is_empty()
    }
}

/// Append payload used to create a new [`DiveRecord`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiveDraft {
    /// Calendar date of the dive.
    pub date: Option<NaiveDate>,
    /// Diver name.
    pub diver: String,
    /// Free-text site name.
    pub location: String,
    /// Site position.
    pub coordinates: Coordinates,
    /// Whether the location was resolved.
    pub location_verified: bool,
    /// Entry time.
    pub start_time: Option<NaiveTime>,
    /// Exit time.
    pub end_time: Option<NaiveTime>,
    /// Maximum depth in meters.
    pub depth_m: f64,
    /// Dive time in minutes.
    pub duration_min: u32,
    /// Dive activity.
    pub activity: Activity,
    /// Buddy name.
    pub buddy: String,
    /// Free-form notes.
    pub notes: String,
    /// Equipment used.
    pub equipment: String,
    /// Breathing gas.
    pub tank_type: TankType,
    /// Tank pressure before the dive, in bar.
    pub air_before_bar: u32,
    /// Tank pressure after the dive, in bar.
    pub air_after_bar: u32,
    /// Site photo.
    pub photo: Option<Photo>,
}

impl TryFrom<DiveDraft> for DiveRecord {
    type Error = RecordError;

    fn try_from(draft: DiveDraft) -> Result<Self, Self::Error> {
        if !draft.depth_m.is_finite() || draft.depth_m < 0.0 {
            return Err(RecordError::InvalidDepth(draft.depth_m));
        }
        if !draft.coordinates.is_valid() {
            return Err(RecordError::InvalidCoordinates {
                latitude: draft.coordinates.latitude,
                longitude: draft.coordinates.longitude,
            });
        }

        Ok(DiveRecord {
            date: draft.date,
            diver: draft.diver,
            location: draft.location,
            coordinates: draft.coordinates,
            location_verified: draft.location_verified,
            start_time: draft.start_time,
            end_time: draft.end_time,
            depth_m: draft.depth_m,
            duration_min: draft.duration_min,
            activity: draft.activity,
            buddy: draft.buddy,
            notes: draft.notes,
            equipment: draft.equipment,
            tank_type: draft.tank_type,
            air_before_bar: draft.air_before_bar,
            air_after_bar: draft.air_after_bar,
            photo: draft.photo,
        })
    }
}

impl From<DiveRecord> for DiveDraft {
    fn from(rec: DiveRecord) -> Self {
        Self {
            date: rec.date,
            diver: rec.diver,
            location: rec.location,
            coordinates: rec.coordinates,
            location_verified: rec.location_verified,
            start_time: rec.start_time,
            end_time: rec.end_time,
            depth_m: rec.depth_m,
            duration_min: rec.duration_min,
            activity: rec.activity,
            buddy: rec.buddy,
            notes: rec.notes,
            equipment: rec.equipment,
            tank_type: rec.tank_type,
            air_before_bar: rec.air_before_bar,
            air_after_bar: rec.air_after_bar,
            photo: rec.photo,
        }
    }
}

/// Formats a time of day as zero-padded `HH:MM`.
pub fn format_hhmm(t: NaiveTime) -> String {
    t.format(hhmm::FORMAT).to_string()
}

/// Parses `HH:MM`, also accepting `HH:MM:SS`.
pub fn parse_hhmm(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, hhmm::FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => s.serialize_str(&super::format_hhmm(*t)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => super::parse_hhmm(&s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid time of day `{s}`"))),
        }
    }
}
