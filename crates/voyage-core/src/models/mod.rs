//! Data models for trips, days, events, and locations.
//!
//! These are the typed write-side models: rows that the library creates and
//! updates have a fixed shape. Read-side *projections* (schema-driven field
//! selection for the schedule view) are dynamic and live in
//! [`crate::schema`] instead — they are `serde_json` maps keyed by
//! client-facing field names, not structs.
//!
//! Serialization follows the client wire format: camelCase keys, order
//! columns exposed as `dayOrder`/`eventOrder`, timestamps as epoch
//! milliseconds.

pub mod day;
pub mod duration;
pub mod event;
pub mod json_column;
pub mod location;
pub mod status;
pub mod trip;

// Re-export all public types at the models level
pub use day::Day;
pub use duration::{format_duration_text, DurationParts};
pub use event::Event;
pub use json_column::JsonColumn;
pub use location::{normalize_location_id, Location};
pub use status::{CardType, EventState, TripStatus, Visibility};
pub use trip::Trip;
