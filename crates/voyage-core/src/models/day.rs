//! Day model definition.

use serde::{Deserialize, Serialize};

/// A single day of a trip's itinerary.
///
/// Days are ordered by `order` within their trip; the calendar `date` is
/// optional, so a day may be identified purely by its opaque id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    /// Unique identifier for the day
    pub id: String,

    /// ID of the owning trip
    pub trip_id: String,

    /// Chronological display order within the trip (0-indexed, contiguous)
    #[serde(rename = "dayOrder")]
    pub order: u32,

    /// Calendar date as `YYYY-MM-DD`, when set
    pub date: Option<String>,

    /// Short display label, e.g. "6月19日"
    pub short_date: Option<String>,

    /// Free-text location hint for the day
    pub location: Option<String>,

    /// Day title
    pub title: Option<String>,

    /// Day description
    pub description: Option<String>,

    /// Cover image URL
    pub cover_image: Option<String>,

    /// Creation time (epoch milliseconds)
    pub created_at: i64,

    /// Last update time (epoch milliseconds)
    pub updated_at: i64,
}
