use serde::Serialize;

use crate::core::{
    store::DiveLog,
    table::{Column, ColumnSet},
};

use super::{
    series::{DepthPoint, MapPoint, depth_over_time, map_points},
    summary::{DEFAULT_TOP_LOCATIONS, Summary},
};

/// Panels a dashboard can show for a log, each gated on the columns its
/// data came from. `None` means "do not render".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// Always shown.
    pub total_dives: usize,
    /// Needs `Duration (min)`.
    pub total_duration_min: Option<u64>,
    /// Needs `Depth (m)` and at least one record.
    pub average_depth_m: Option<f64>,
    /// Needs `Depth (m)` and at least one record.
    pub deepest_m: Option<f64>,
    /// Needs `Location`.
    pub favorite_location: Option<String>,
    /// Needs `Date` and `Depth (m)` and at least one dated record.
    pub depth_chart: Option<Vec<DepthPoint>>,
    /// Needs `Latitude` and `Longitude`.
    pub map: Option<Vec<MapPoint>>,
}

impl DashboardView {
    pub fn build(log: &DiveLog, columns: &ColumnSet) -> Self {
        let summary = Summary::compute(log, DEFAULT_TOP_LOCATIONS);
        let has_depth = columns.contains(Column::Depth);

        let depth_chart = if columns.contains_all(&[Column::Date, Column::Depth]) {
            Some(depth_over_time(log)).filter(|points| !points.is_empty())
        } else {
            None
        };

        let map = columns
            .contains_all(&[Column::Latitude, Column::Longitude])
            .then(|| map_points(log));

        Self {
            total_dives: summary.total_dives,
            total_duration_min: columns
                .contains(Column::Duration)
                .then_some(summary.total_duration_min),
            average_depth_m: summary.average_depth_m.filter(|_| has_depth),
            deepest_m: summary.deepest_m.filter(|_| has_depth),
            favorite_location: columns
                .contains(Column::Location)
                .then_some(summary.favorite_location),
            depth_chart,
            map,
        }
    }
}
