//! Session-scoped scuba dive logging: an in-memory dive log with summary
//! statistics, chart series, CSV import and CSV/report/JSON export.
//!
//! # Examples
//!
//! Store usage with [`core::store::DiveLog`]:
//! ```
//! use chrono::NaiveDate;
//! use divelog::{core::store::DiveLog, dive::DiveDraft};
//!
//! let mut log = DiveLog::new();
//! let idx = log.append(DiveDraft {
//!     date: NaiveDate::from_ymd_opt(2024, 1, 1),
//!     location: "Reef A".to_string(),
//!     depth_m: 18.0,
//!     duration_min: 45,
//!     ..DiveDraft::default()
//! }).expect("append");
//! assert_eq!(idx, 0);
//!
//! let summary = log.summary();
//! assert_eq!(summary.favorite_location, "Reef A");
//! assert_eq!(summary.deepest_m, Some(18.0));
//! ```
//!
//! Session usage with a geocoder:
//! ```
//! use chrono::NaiveDate;
//! use divelog::{
//!     geocode::StaticGeocoder,
//!     session::{form::DiveForm, handle::{DiveSession, SessionConfig}},
//!     types::Coordinates,
//! };
//!
//! let geocoder = StaticGeocoder::new().with_place("Blue Hole", Coordinates::new(17.3160, -87.5347));
//! let mut session = DiveSession::new(SessionConfig::default(), Some(Box::new(geocoder)));
//!
//! let date = NaiveDate::from_ymd_opt(2024, 3, 9).expect("date");
//! let idx = session
//!     .submit(DiveForm::new(date).with_location("Blue Hole").with_depth(40.0, 38))
//!     .expect("submit");
//! assert!(session.log().get(idx).expect("record").location_verified);
//! ```

/// Dive log store, location tally and table projection.
pub mod core;
/// Dive records and drafts.
pub mod dive;
/// Export sinks.
pub mod export;
/// Geocoding contract.
pub mod geocode;
/// Dive-log CSV import.
pub mod import;
/// Photo blobs.
pub mod photo;
/// Dive-computer profile parsing.
pub mod profile;
/// Session object mediating user requests.
pub mod session;
/// Summary statistics and chart series.
pub mod stats;
/// Shared primitive types and enums.
pub mod types;
