use chrono::{NaiveDate, NaiveTime};

use crate::types::{Activity, Coordinates, TankType};

/// Values entered in the "log a new dive" form.
#[derive(Debug, Clone, PartialEq)]
pub struct DiveForm {
    pub date: NaiveDate,
    pub diver: String,
    pub location: String,
    /// Manually entered coordinates; stored instead of geocoded ones, and
    /// the dive is left unverified when they differ.
    pub coordinates: Option<Coordinates>,
    /// Submit even when the location cannot be resolved.
    pub accept_unverified: bool,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub depth_m: f64,
    pub duration_min: u32,
    pub activity: Activity,
    pub buddy: String,
    pub notes: String,
    pub equipment: String,
    pub tank_type: TankType,
    pub air_before_bar: u32,
    pub air_after_bar: u32,
    /// Uploaded image bytes.
    pub photo: Option<Vec<u8>>,
}

pub const DEFAULT_AIR_BEFORE_BAR: u32 = 200;
pub const DEFAULT_AIR_AFTER_BAR: u32 = 50;

impl DiveForm {
    /// A blank form for `date` with the usual defaults: 09:00 to 09:45,
    /// 200 to 50 bar, fun dive on air.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            diver: String::new(),
            location: String::new(),
            coordinates: None,
            accept_unverified: false,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            end_time: NaiveTime::from_hms_opt(9, 45, 0).unwrap_or_default(),
            depth_m: 0.0,
            duration_min: 0,
            activity: Activity::default(),
            buddy: String::new(),
            notes: String::new(),
            equipment: String::new(),
            tank_type: TankType::default(),
            air_before_bar: DEFAULT_AIR_BEFORE_BAR,
            air_after_bar: DEFAULT_AIR_AFTER_BAR,
            photo: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_depth(mut self, depth_m: f64, duration_min: u32) -> Self {
        self.depth_m = depth_m;
        self.duration_min = duration_min;
        self
    }
}
