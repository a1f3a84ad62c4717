use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    core::store::DiveLog,
    types::{AxisOrientation, Coordinates},
};

/// Depth axis direction for depth-over-time charts.
pub const DEPTH_AXIS: AxisOrientation = AxisOrientation::Downward;

/// One point of the depth-over-time chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DepthPoint {
    /// Dive date.
    pub date: NaiveDate,
    /// Maximum depth in meters.
    pub depth_m: f64,
}

/// One dive site marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    /// Location text of the record.
    pub location: String,
    /// Marker position.
    pub coordinates: Coordinates,
    /// Whether the position came from the geocoder.
    pub verified: bool,
}

/// Dated records in chronological order as `(date, depth)` points.
pub fn depth_over_time(log: &DiveLog) -> Vec<DepthPoint> {
    log.chronological()
        .into_iter()
        .filter_map(|rec| {
            rec.date.map(|date| DepthPoint {
                date,
                depth_m: rec.depth_m,
            })
        })
        .collect()
}

/// Records with resolved coordinates, in log order.
pub fn map_points(log: &DiveLog) -> Vec<MapPoint> {
    log.iter()
        .filter(|rec| !rec.coordinates.is_sentinel())
        .map(|rec| MapPoint {
            location: rec.location.clone(),
            coordinates: rec.coordinates,
            verified: rec.location_verified,
        })
        .collect()
}
