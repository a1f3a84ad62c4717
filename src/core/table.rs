use std::fmt;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::{
    dive::{DiveRecord, format_hhmm},
    photo::Photo,
};

/// Date rendering shared by table, export and import.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Date,
    Diver,
    Location,
    Latitude,
    Longitude,
    LocationVerified,
    StartTime,
    EndTime,
    Depth,
    Duration,
    Activity,
    Buddy,
    Notes,
    Equipment,
    TankType,
    AirBefore,
    AirAfter,
    AirUsed,
    Image,
}

impl Column {
    pub const ALL: [Column; 19] = [
        Column::Date,
        Column::Diver,
        Column::Location,
        Column::Latitude,
        Column::Longitude,
        Column::LocationVerified,
        Column::StartTime,
        Column::EndTime,
        Column::Depth,
        Column::Duration,
        Column::Activity,
        Column::Buddy,
        Column::Notes,
        Column::Equipment,
        Column::TankType,
        Column::AirBefore,
        Column::AirAfter,
        Column::AirUsed,
        Column::Image,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::Diver => "Diver",
            Column::Location => "Location",
            Column::Latitude => "Latitude",
            Column::Longitude => "Longitude",
            Column::LocationVerified => "Location Verified",
            Column::StartTime => "Start Time",
            Column::EndTime => "End Time",
            Column::Depth => "Depth (m)",
            Column::Duration => "Duration (min)",
            Column::Activity => "Activity",
            Column::Buddy => "Buddy",
            Column::Notes => "Notes",
            Column::Equipment => "Equipment",
            Column::TankType => "Tank Type",
            Column::AirBefore => "Air Before (bar)",
            Column::AirAfter => "Air After (bar)",
            Column::AirUsed => "Air Used (bar)",
            Column::Image => "Image",
        }
    }

    /// Exact, whitespace-trimmed header match.
    pub fn from_header(header: &str) -> Option<Self> {
        let header = header.trim();
        Column::ALL.into_iter().find(|c| c.header() == header)
    }

    /// Every column except [`Column::Image`], in table order.
    pub fn exported() -> impl Iterator<Item = Column> {
        Column::ALL.into_iter().filter(|c| *c != Column::Image)
    }

    pub fn cell(self, rec: &DiveRecord) -> Cell {
        let text = match self {
            Column::Date => rec
                .date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            Column::Diver => rec.diver.clone(),
            Column::Location => rec.location.clone(),
            Column::Latitude => format!("{:.6}", rec.coordinates.latitude),
            Column::Longitude => format!("{:.6}", rec.coordinates.longitude),
            Column::LocationVerified => rec.location_verified.to_string(),
            Column::StartTime => rec.start_time.map(format_hhmm).unwrap_or_default(),
            Column::EndTime => rec.end_time.map(format_hhmm).unwrap_or_default(),
            Column::Depth => format!("{:.1}", rec.depth_m),
            Column::Duration => rec.duration_min.to_string(),
            Column::Activity => rec.activity.label().to_string(),
            Column::Buddy => rec.buddy.clone(),
            Column::Notes => rec.notes.clone(),
            Column::Equipment => rec.equipment.clone(),
            Column::TankType => rec.tank_type.label().to_string(),
            Column::AirBefore => rec.air_before_bar.to_string(),
            Column::AirAfter => rec.air_after_bar.to_string(),
            Column::AirUsed => rec.air_used_bar().to_string(),
            Column::Image => return Cell::Image(rec.photo.clone()),
        };
        Cell::Text(text)
    }

    /// Cell text for files that are read back: measurements keep full
    /// precision instead of the rounded display form.
    pub fn exact_text(self, rec: &DiveRecord) -> String {
        match self {
            Column::Latitude => rec.coordinates.latitude.to_string(),
            Column::Longitude => rec.coordinates.longitude.to_string(),
            Column::Depth => rec.depth_m.to_string(),
            other => other.cell(rec).to_string(),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Image(Option<Photo>),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Image(Some(photo)) => write!(f, "[image, {} bytes]", photo.len()),
            Cell::Image(None) => Ok(()),
        }
    }
}

/// One projected record: `(column, cell)` pairs in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub cells: Vec<(Column, Cell)>,
}

impl TableRow {
    pub fn project(rec: &DiveRecord, include_image: bool) -> Self {
        let cells = Column::ALL
            .into_iter()
            .filter(|c| include_image || *c != Column::Image)
            .map(|c| (c, c.cell(rec)))
            .collect();
        Self { cells }
    }

    pub fn get(&self, column: Column) -> Option<&Cell> {
        self.cells
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, cell)| cell)
    }

    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.cells.iter().map(|(c, _)| *c)
    }

    /// Cell texts in column order.
    pub fn texts(&self) -> Vec<String> {
        self.cells.iter().map(|(_, cell)| cell.to_string()).collect()
    }
}

/// Columns known to be present for every record of a log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSet {
    columns: HashSet<Column>,
}

impl ColumnSet {
    /// Every column; logs built from form entries carry all fields.
    pub fn all() -> Self {
        Column::ALL.into_iter().collect()
    }

    pub fn empty() -> Self {
        Self {
            columns: HashSet::new(),
        }
    }

    /// Recognised columns among `headers`; unknown headers are skipped.
    pub fn from_headers<'h>(headers: impl IntoIterator<Item = &'h str>) -> Self {
        headers.into_iter().filter_map(Column::from_header).collect()
    }

    pub fn contains(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub fn contains_all(&self, columns: &[Column]) -> bool {
        columns.iter().all(|c| self.contains(*c))
    }

    pub fn insert(&mut self, column: Column) -> bool {
        self.columns.insert(column)
    }

    pub fn intersection(&self, other: &ColumnSet) -> ColumnSet {
        self.columns.intersection(&other.columns).copied().collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl FromIterator<Column> for ColumnSet {
    fn from_iter<I: IntoIterator<Item = Column>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}
