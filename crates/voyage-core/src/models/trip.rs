//! Trip model definition.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{TripStatus, Visibility};

/// A trip: the root of an itinerary, owning days and their events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    /// Unique identifier for the trip
    pub id: String,

    /// ID of the owning user
    pub user_id: String,

    /// Trip title
    pub title: String,

    /// Free-text description
    pub description: Option<String>,

    /// First day of the trip as `YYYY-MM-DD`
    pub start_date: Option<String>,

    /// Last day of the trip as `YYYY-MM-DD`
    pub end_date: Option<String>,

    /// Planned number of days
    pub days: i64,

    /// Visited cities (JSON array in storage)
    pub city_list: Value,

    /// Cover image URL
    pub cover_image: Option<String>,

    /// Editorial status
    pub status: TripStatus,

    /// Visibility to non-owners
    pub visibility: Visibility,

    /// Completion percentage in `[0, 100]`, derived at read time from the
    /// event hierarchy; never stored.
    pub completed: u8,

    /// Creation time (epoch milliseconds)
    pub created_at: i64,

    /// Last update time (epoch milliseconds)
    pub updated_at: i64,
}

impl Trip {
    /// True when non-owners may read this trip.
    pub fn is_publicly_readable(&self) -> bool {
        self.visibility == Visibility::Public && self.status == TripStatus::Published
    }
}
