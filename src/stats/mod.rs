//! Aggregates and chart series derived from a dive log.

/// Column-gated dashboard panels.
pub mod dashboard;
/// Depth-over-time and map series.
pub mod series;
/// Summary statistics.
pub mod summary;
