use std::{io::Read, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    core::{
        store::{DiveLog, StoreError},
        table::{ColumnSet, TableRow},
    },
    dive::{DiveDraft, DiveRecord},
    export::{ExportError, ExportSink},
    geocode::{GeocodeOutcome, Geocoder},
    import::{self, ImportFailure, ImportReport, ImportedSource},
    photo::{Photo, PhotoStatus},
    profile::{DepthProfile, ProfileError},
    stats::{
        dashboard::DashboardView,
        summary::{DEFAULT_TOP_LOCATIONS, Summary},
    },
    types::{Coordinates, DiveIndex},
};

use super::{events::SessionEvent, form::DiveForm};

/// Why a location counts as unresolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unresolved {
    Blank,
    NotFound,
    Unavailable,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("location `{location}` could not be verified ({reason:?})")]
    LocationUnresolved { location: String, reason: Unresolved },
    #[error("photo could not be decoded: {reason}")]
    CorruptPhoto { reason: String },
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// What to do with a form whose location did not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationPolicy {
    /// Keep the dive with sentinel coordinates, flagged unverified.
    #[default]
    AllowUnverified,
    /// Reject unless the form sets `accept_unverified`.
    RequireResolved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub location_policy: LocationPolicy,
    pub top_locations: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            location_policy: LocationPolicy::default(),
            top_locations: DEFAULT_TOP_LOCATIONS,
        }
    }
}

impl SessionConfig {
    /// Parses a JSON config; absent keys keep their defaults.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Photo of one record and whether it decodes.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryItem {
    pub index: DiveIndex,
    pub location: String,
    pub status: PhotoStatus,
}

/// Merge result of an import request.
#[derive(Debug)]
pub struct ImportOutcome {
    pub imported: Vec<ImportedSource>,
    /// Dives merged across all sources.
    pub dives: usize,
    pub failures: Vec<ImportFailure>,
}

/// One user's dive log for the lifetime of a session.
///
/// Every request runs to completion before the next; nothing here is
/// shared across threads.
pub struct DiveSession {
    log: DiveLog,
    columns: ColumnSet,
    geocoder: Option<Box<dyn Geocoder>>,
    config: SessionConfig,
    events: Vec<SessionEvent>,
}

impl DiveSession {
    /// Starts an empty session. Without a geocoder every lookup reports
    /// [`GeocodeOutcome::Unavailable`].
    pub fn new(config: SessionConfig, geocoder: Option<Box<dyn Geocoder>>) -> Self {
        Self {
            log: DiveLog::new(),
            columns: ColumnSet::all(),
            geocoder,
            config,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn log(&self) -> &DiveLog {
        &self.log
    }

    /// Columns present for every record currently held. An empty log, or
    /// one started from a form entry, carries every column.
    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    /// Ends the session, handing back its log.
    pub fn into_log(self) -> DiveLog {
        self.log
    }

    pub fn submit(&mut self, form: DiveForm) -> Result<DiveIndex, SessionError> {
        let photo = match form.photo {
            Some(ref bytes) if !bytes.is_empty() => {
                let photo = Photo::new(bytes.clone());
                if let PhotoStatus::Corrupt { reason } = photo.decode() {
                    tracing::warn!(%reason, "rejecting dive with unreadable photo");
                    return Err(SessionError::CorruptPhoto { reason });
                }
                Some(photo)
            }
            _ => None,
        };

        let (coordinates, location_verified) = self.resolve_location(&form)?;

        let draft = DiveDraft {
            date: Some(form.date),
            diver: form.diver,
            location: form.location.trim().to_string(),
            coordinates,
            location_verified,
            start_time: Some(form.start_time),
            end_time: Some(form.end_time),
            depth_m: form.depth_m,
            duration_min: form.duration_min,
            activity: form.activity,
            buddy: form.buddy,
            notes: form.notes,
            equipment: form.equipment,
            tank_type: form.tank_type,
            air_before_bar: form.air_before_bar,
            air_after_bar: form.air_after_bar,
            photo,
        };

        let was_empty = self.log.is_empty();
        let index = self.log.append(draft)?;
        if was_empty {
            self.columns = ColumnSet::all();
        }
        tracing::info!(index, verified = location_verified, "dive logged");
        self.events.push(SessionEvent::DiveLogged {
            index,
            verified: location_verified,
        });
        Ok(index)
    }

    pub fn delete(&mut self, index: DiveIndex) -> Result<DiveRecord, SessionError> {
        let removed = self.log.delete_at(index)?;
        if self.log.is_empty() {
            self.columns = ColumnSet::all();
        }
        tracing::info!(index, remaining = self.log.len(), "dive deleted");
        self.events.push(SessionEvent::DiveDeleted { index });
        Ok(removed)
    }

    /// Merges a batch import; failed sources are reported, not fatal.
    pub fn import(&mut self, report: ImportReport) -> ImportOutcome {
        let ImportReport {
            log,
            columns,
            imported,
            failures,
        } = report;

        if let Some(columns) = columns {
            self.columns = if self.log.is_empty() {
                columns
            } else {
                self.columns.intersection(&columns)
            };
        }

        let dives = log.len();
        self.log.merge(log);

        for source in &imported {
            self.events.push(SessionEvent::SourceImported {
                source: source.source.clone(),
                dives: source.dives,
            });
        }
        for failure in &failures {
            self.events.push(SessionEvent::SourceFailed {
                source: failure.source.clone(),
                message: failure.error.to_string(),
            });
        }

        ImportOutcome {
            imported,
            dives,
            failures,
        }
    }

    pub fn import_sources<I, S, R>(&mut self, sources: I) -> ImportOutcome
    where
        I: IntoIterator<Item = (S, R)>,
        S: Into<String>,
        R: Read,
    {
        self.import(import::import_sources(sources))
    }

    pub fn import_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> ImportOutcome {
        self.import(import::import_files(paths))
    }

    pub fn summary(&self) -> Summary {
        Summary::compute(&self.log, self.config.top_locations)
    }

    pub fn chronological(&self) -> Vec<&DiveRecord> {
        self.log.chronological()
    }

    pub fn table(&self, include_image: bool) -> Vec<TableRow> {
        self.log.as_table(include_image)
    }

    pub fn dashboard(&self) -> DashboardView {
        DashboardView::build(&self.log, &self.columns)
    }

    pub fn gallery(&self) -> Vec<GalleryItem> {
        self.log
            .iter()
            .enumerate()
            .filter_map(|(index, rec)| {
                rec.photo.as_ref().map(|photo| GalleryItem {
                    index,
                    location: rec.location.clone(),
                    status: photo.decode(),
                })
            })
            .collect()
    }

    /// Parses a dive-computer profile; independent of the log.
    pub fn load_profile<R: Read>(&self, reader: R) -> Result<DepthProfile, SessionError> {
        DepthProfile::from_csv(reader).map_err(|err| {
            tracing::warn!(error = %err, "dive profile rejected");
            SessionError::from(err)
        })
    }

    pub fn export(&self, sink: &mut dyn ExportSink) -> Result<usize, SessionError> {
        let written = sink.write_log(&self.log)?;
        sink.flush()?;
        tracing::debug!(written, "dive log exported");
        Ok(written)
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    fn lookup(&mut self, location: &str) -> GeocodeOutcome {
        let outcome = self
            .geocoder
            .as_ref()
            .map_or(GeocodeOutcome::Unavailable, |g| g.geocode(location));
        match outcome {
            GeocodeOutcome::Resolved(c) => {
                tracing::debug!(location, latitude = c.latitude, longitude = c.longitude, "location resolved")
            }
            GeocodeOutcome::NotFound => tracing::warn!(location, "location not found"),
            GeocodeOutcome::Unavailable => tracing::warn!(location, "geocoding service unavailable"),
        }
        self.events.push(SessionEvent::LocationChecked {
            location: location.to_string(),
            outcome,
        });
        outcome
    }

    fn resolve_location(&mut self, form: &DiveForm) -> Result<(Coordinates, bool), SessionError> {
        let location = form.location.trim();
        let reason = if location.is_empty() {
            Unresolved::Blank
        } else {
            match self.lookup(location) {
                // Verified means the stored position is the geocoder's; a
                // differing manual entry is kept but not vouched for.
                GeocodeOutcome::Resolved(found) => {
                    return Ok(match form.coordinates {
                        Some(manual) if manual != found => (manual, false),
                        _ => (found, true),
                    });
                }
                GeocodeOutcome::NotFound => Unresolved::NotFound,
                GeocodeOutcome::Unavailable => Unresolved::Unavailable,
            }
        };

        if self.config.location_policy == LocationPolicy::RequireResolved && !form.accept_unverified {
            return Err(SessionError::LocationUnresolved {
                location: location.to_string(),
                reason,
            });
        }
        Ok((form.coordinates.unwrap_or(Coordinates::SENTINEL), false))
    }
}
