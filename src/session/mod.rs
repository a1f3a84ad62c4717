//! Session-owned dive log and request handling.

/// Event payloads recorded by the session.
pub mod events;
/// Form input for logging a dive.
pub mod form;
/// Session object and configuration.
pub mod handle;
