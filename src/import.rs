//! Dive-log CSV import.
//!
//! Files may carry any subset of the table columns in any order; unknown
//! columns are ignored and empty cells take record defaults. Several files
//! can be read as one batch: a file that fails is reported and skipped, the
//! rest are merged in the order given.

use std::{fs::File, io::Read, path::Path};

use chrono::NaiveDate;
use thiserror::Error;

use crate::{
    core::{
        store::{DiveLog, StoreError},
        table::{Column, ColumnSet},
    },
    dive::{DiveDraft, parse_hhmm},
    types::{Activity, Coordinates, TankType},
};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];

/// Why a source could not be imported.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: invalid {column} value `{value}`")]
    InvalidValue {
        row: usize,
        column: Column,
        value: String,
    },
    #[error("row {row}: {source}")]
    InvalidRecord { row: usize, source: StoreError },
}

/// One successfully read source.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedLog {
    pub log: DiveLog,
    /// Recognised columns in the source header.
    pub columns: ColumnSet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedSource {
    pub source: String,
    pub dives: usize,
}

#[derive(Debug)]
pub struct ImportFailure {
    pub source: String,
    pub error: ImportError,
}

/// Outcome of a batch import.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Records of every successful source, in source then row order.
    pub log: DiveLog,
    /// Columns shared by every successful source; `None` if none succeeded.
    pub columns: Option<ColumnSet>,
    /// Sources that were read, in order.
    pub imported: Vec<ImportedSource>,
    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Reads one dive-log CSV. Any bad row fails the whole source.
pub fn read_log<R: Read>(reader: R) -> Result<ImportedLog, ImportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let layout: Vec<(Column, usize)> = headers
        .iter()
        .enumerate()
        .filter_map(|(idx, h)| Column::from_header(h).map(|c| (c, idx)))
        .collect();
    let columns: ColumnSet = layout.iter().map(|(c, _)| *c).collect();

    let mut log = DiveLog::new();
    for (i, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let row = RowReader {
            row: i + 1,
            record: &rec,
            layout: &layout,
        };
        let draft = row.draft()?;
        log.append(draft)
            .map_err(|source| ImportError::InvalidRecord { row: i + 1, source })?;
    }

    Ok(ImportedLog { log, columns })
}

/// Reads each `(name, reader)` source in order, continuing past failures.
pub fn import_sources<I, S, R>(sources: I) -> ImportReport
where
    I: IntoIterator<Item = (S, R)>,
    S: Into<String>,
    R: Read,
{
    let mut report = ImportReport::default();
    for (name, reader) in sources {
        let name = name.into();
        match read_log(reader) {
            Ok(imported) => report.accept(name, imported),
            Err(error) => report.reject(name, error),
        }
    }
    report
}

/// Opens and reads each path in order, continuing past failures.
pub fn import_files<P: AsRef<Path>>(paths: &[P]) -> ImportReport {
    let mut report = ImportReport::default();
    for path in paths {
        let name = path.as_ref().display().to_string();
        let result = File::open(path)
            .map_err(ImportError::from)
            .and_then(read_log);
        match result {
            Ok(imported) => report.accept(name, imported),
            Err(error) => report.reject(name, error),
        }
    }
    report
}

impl ImportReport {
    fn accept(&mut self, name: String, imported: ImportedLog) {
        let dives = imported.log.len();
        tracing::info!(source = %name, dives, "imported dive log");
        self.columns = Some(match self.columns.take() {
            Some(shared) => shared.intersection(&imported.columns),
            None => imported.columns,
        });
        self.log.merge(imported.log);
        self.imported.push(ImportedSource {
            source: name,
            dives,
        });
    }

    fn reject(&mut self, name: String, error: ImportError) {
        tracing::warn!(source = %name, error = %error, "skipping dive log that failed to import");
        self.failures.push(ImportFailure {
            source: name,
            error,
        });
    }
}

struct RowReader<'r> {
    row: usize,
    record: &'r csv::StringRecord,
    layout: &'r [(Column, usize)],
}

impl RowReader<'_> {
    fn cell(&self, column: Column) -> Option<&str> {
        self.layout
            .iter()
            .find(|(c, _)| *c == column)
            .and_then(|(_, idx)| self.record.get(*idx))
            .filter(|s| !s.is_empty())
    }

    fn text(&self, column: Column) -> String {
        self.cell(column).unwrap_or_default().to_string()
    }

    fn invalid(&self, column: Column, value: &str) -> ImportError {
        ImportError::InvalidValue {
            row: self.row,
            column,
            value: value.to_string(),
        }
    }

    fn parsed<T>(&self, column: Column, parse: impl Fn(&str) -> Option<T>) -> Result<Option<T>, ImportError> {
        match self.cell(column) {
            None => Ok(None),
            Some(raw) => parse(raw).map(Some).ok_or_else(|| self.invalid(column, raw)),
        }
    }

    fn draft(&self) -> Result<DiveDraft, ImportError> {
        let latitude = self.parsed(Column::Latitude, parse_float)?.unwrap_or(0.0);
        let longitude = self.parsed(Column::Longitude, parse_float)?.unwrap_or(0.0);

        let activity = self.cell(Column::Activity).map_or(Activity::default(), |raw| {
            raw.parse().unwrap_or_else(|_| {
                tracing::debug!(row = self.row, value = raw, "unknown activity, using Other");
                Activity::Other
            })
        });
        let tank_type = self.cell(Column::TankType).map_or(TankType::default(), |raw| {
            raw.parse().unwrap_or_else(|_| {
                tracing::debug!(row = self.row, value = raw, "unknown tank type, using Other");
                TankType::Other
            })
        });

        Ok(DiveDraft {
            date: self.parsed(Column::Date, parse_date)?,
            diver: self.text(Column::Diver),
            location: self.text(Column::Location),
            coordinates: Coordinates::new(latitude, longitude),
            location_verified: self.parsed(Column::LocationVerified, parse_bool)?.unwrap_or(false),
            start_time: self.parsed(Column::StartTime, parse_hhmm)?,
            end_time: self.parsed(Column::EndTime, parse_hhmm)?,
            depth_m: self.parsed(Column::Depth, parse_float)?.unwrap_or(0.0),
            duration_min: self.parsed(Column::Duration, parse_count)?.unwrap_or(0),
            activity,
            buddy: self.text(Column::Buddy),
            notes: self.text(Column::Notes),
            equipment: self.text(Column::Equipment),
            tank_type,
            air_before_bar: self.parsed(Column::AirBefore, parse_count)?.unwrap_or(0),
            air_after_bar: self.parsed(Column::AirAfter, parse_count)?.unwrap_or(0),
            photo: None,
        })
    }
}

/// Parses a calendar date, tolerating a trailing time component.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let head = raw.split(['T', ' ']).next().unwrap_or(raw);
    [raw, head].into_iter().find_map(|candidate| {
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(candidate, fmt).ok())
    })
}

fn parse_float(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

// Spreadsheet tools often write whole numbers as "45.0".
fn parse_count(raw: &str) -> Option<u32> {
    if let Ok(v) = raw.parse::<u32>() {
        return Some(v);
    }
    let v = raw.parse::<f64>().ok()?;
    (v.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&v)).then_some(v as u32)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}
