//! In-memory dive log store, location tally and table projection.

/// Location counting helpers.
pub mod indices;
/// Session-owned dive log store.
pub mod store;
/// Column model and row projection for display and export.
pub mod table;
