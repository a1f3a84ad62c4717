//! Session event payloads.

use crate::{geocode::GeocodeOutcome, types::DiveIndex};

/// Notifications recorded by a session for the UI to show.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A geocoding lookup finished.
    LocationChecked {
        /// Place name looked up.
        location: String,
        /// What the geocoder reported.
        outcome: GeocodeOutcome,
    },
    /// A dive was appended.
    DiveLogged {
        /// Index of the new record.
        index: DiveIndex,
        /// Whether its location was resolved.
        verified: bool,
    },
    /// A dive was removed.
    DiveDeleted {
        /// Index the record had.
        index: DiveIndex,
    },
    /// A source was merged into the log.
    SourceImported {
        /// Source name.
        source: String,
        /// Dives merged from it.
        dives: usize,
    },
    /// A source failed and was skipped.
    SourceFailed {
        /// Source name.
        source: String,
        /// Rendered error.
        message: String,
    },
}
