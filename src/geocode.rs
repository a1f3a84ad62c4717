//! Place-name geocoding contract.

use hashbrown::HashMap;

use crate::types::Coordinates;

/// What a geocoder reported for a place name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeocodeOutcome {
    /// The place was found.
    Resolved(Coordinates),
    /// The service answered but knows no such place.
    NotFound,
    /// The service could not be reached.
    Unavailable,
}

/// Resolves a free-text place name to coordinates.
pub trait Geocoder {
    /// Single synchronous lookup, no retries.
    fn geocode(&self, place: &str) -> GeocodeOutcome;
}

impl<F> Geocoder for F
where
    F: Fn(&str) -> GeocodeOutcome,
{
    fn geocode(&self, place: &str) -> GeocodeOutcome {
        self(place)
    }
}

/// In-memory gazetteer keyed by case-insensitive place name.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    places: HashMap<String, Coordinates>,
    offline: bool,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a place.
    pub fn with_place(mut self, name: &str, coordinates: Coordinates) -> Self {
        self.places.insert(normalize(name), coordinates);
        self
    }

    /// Every lookup reports [`GeocodeOutcome::Unavailable`] while offline.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }
}

impl Geocoder for StaticGeocoder {
    fn geocode(&self, place: &str) -> GeocodeOutcome {
        if self.offline {
            return GeocodeOutcome::Unavailable;
        }
        self.places
            .get(&normalize(place))
            .copied()
            .map_or(GeocodeOutcome::NotFound, GeocodeOutcome::Resolved)
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
