//! Shared primitive types and dive-related enums.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Position of a record in a log's insertion order.
pub type DiveIndex = usize;

/// Kind of dive logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Activity {
    /// Recreational dive.
    #[default]
    FunDive,
    /// Course or skills dive.
    Training,
    /// Checkout or refresher dive.
    CheckDive,
    /// Dive beyond recreational depth.
    DeepDive,
    /// Dive after dark.
    NightDive,
    /// Anything else.
    Other,
}

impl Activity {
    /// All activities in form order.
    pub const ALL: [Activity; 6] = [
        Activity::FunDive,
        Activity::Training,
        Activity::CheckDive,
        Activity::DeepDive,
        Activity::NightDive,
        Activity::Other,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Activity::FunDive => "Fun Dive",
            Activity::Training => "Training",
            Activity::CheckDive => "Check Dive",
            Activity::DeepDive => "Deep Dive",
            Activity::NightDive => "Night Dive",
            Activity::Other => "Other",
        }
    }
}

/// Breathing gas in the tank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TankType {
    /// Compressed air.
    #[default]
    Air,
    /// Enriched air.
    Nitrox,
    /// Helium mix.
    Trimix,
    /// Anything else.
    Other,
}

impl TankType {
    /// All tank types in form order.
    pub const ALL: [TankType; 4] = [TankType::Air, TankType::Nitrox, TankType::Trimix, TankType::Other];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            TankType::Air => "Air",
            TankType::Nitrox => "Nitrox",
            TankType::Trimix => "Trimix",
            TankType::Other => "Other",
        }
    }
}

/// Returned when a label matches no known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown label `{0}`")]
pub struct UnknownLabel(pub String);

// Labels compare case-insensitively and ignore spaces, so "Fun Dive",
// "fun dive" and "FunDive" are the same activity.
fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for Activity {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = squash(s);
        Activity::ALL
            .into_iter()
            .find(|a| squash(a.label()) == key)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

impl FromStr for TankType {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = squash(s);
        TankType::ALL
            .into_iter()
            .find(|t| squash(t.label()) == key)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for TankType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude, -90..=90.
    pub latitude: f64,
    /// Longitude, -180..=180.
    pub longitude: f64,
}

impl Coordinates {
    /// `(0.0, 0.0)`: the location has not been geocoded.
    pub const SENTINEL: Coordinates = Coordinates {
        latitude: 0.0,
        longitude: 0.0,
    };

    /// Builds a coordinate pair.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True for the unresolved sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }

    /// True when both components are finite and within range.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Which way a depth axis grows when drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisOrientation {
    /// Larger values drawn higher.
    Upward,
    /// Larger values drawn lower; depth plots use this.
    Downward,
}
