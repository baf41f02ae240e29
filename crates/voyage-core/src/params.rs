//! Parameter structures for Voyage operations
//!
//! Shared parameter structures used across interfaces (currently the CLI)
//! without framework-specific derives. Interface layers define thin wrapper
//! structs carrying their own derives (`clap::Args` for the CLI) and convert
//! into these core types via `From`/`Into`, so the domain logic never
//! depends on a UI framework.
//!
//! Loose client payloads (days, events) travel as raw `serde_json::Value`
//! here and are canonicalized by [`crate::normalize`] inside the operation,
//! not at the interface boundary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{TripStatus, Visibility};
use crate::{Result, VoyageError};

/// Generic parameters for operations addressed by a single id plus the
/// acting user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id {
    /// The id of the resource to operate on
    pub id: String,
    /// The acting user (ownership gate)
    pub user_id: String,
}

/// Parameters for creating a new trip.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTrip {
    /// Owner of the new trip (required)
    pub user_id: String,
    /// Trip title (required)
    pub title: String,
    /// Optional free-text description
    pub description: Option<String>,
    /// First day as `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// Last day as `YYYY-MM-DD`
    pub end_date: Option<String>,
    /// Planned number of days
    pub days: Option<i64>,
    /// Visited cities, stored as a JSON array
    pub city_list: Option<Value>,
    /// Cover image URL
    pub cover_image: Option<String>,
    /// Editorial status (`draft` or `published`)
    pub status: Option<String>,
    /// Visibility (`private`, `public`, or `link`)
    pub visibility: Option<String>,
}

impl CreateTrip {
    /// Validates the parameters and parses the status/visibility strings.
    ///
    /// # Errors
    ///
    /// * `VoyageError::InvalidInput` - empty title, or unparseable
    ///   status/visibility
    pub fn validate(&self) -> Result<(TripStatus, Visibility)> {
        if self.title.trim().is_empty() {
            return Err(VoyageError::invalid_input("title", "Title cannot be empty"));
        }

        let status = match &self.status {
            Some(s) => s
                .parse()
                .map_err(|reason: String| VoyageError::invalid_input("status", reason))?,
            None => TripStatus::default(),
        };

        let visibility = match &self.visibility {
            Some(s) => s
                .parse()
                .map_err(|reason: String| VoyageError::invalid_input("visibility", reason))?,
            None => Visibility::default(),
        };

        Ok((status, visibility))
    }
}

/// Parameters for updating an existing trip. `None` fields are untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTrip {
    /// Trip to update (required)
    pub trip_id: String,
    /// The acting user (must own the trip)
    pub user_id: String,
    /// Updated title
    pub title: Option<String>,
    /// Updated description
    pub description: Option<String>,
    /// Updated start date
    pub start_date: Option<String>,
    /// Updated end date
    pub end_date: Option<String>,
    /// Updated day count
    pub days: Option<i64>,
    /// Updated city list
    pub city_list: Option<Value>,
    /// Updated cover image URL
    pub cover_image: Option<String>,
    /// Updated status
    pub status: Option<String>,
    /// Updated visibility
    pub visibility: Option<String>,
}

impl UpdateTrip {
    /// Parses the optional status/visibility strings.
    ///
    /// # Errors
    ///
    /// * `VoyageError::InvalidInput` - unparseable status or visibility
    pub fn validate(&self) -> Result<(Option<TripStatus>, Option<Visibility>)> {
        let status = self
            .status
            .as_deref()
            .map(|s| {
                s.parse()
                    .map_err(|reason: String| VoyageError::invalid_input("status", reason))
            })
            .transpose()?;

        let visibility = self
            .visibility
            .as_deref()
            .map(|s| {
                s.parse()
                    .map_err(|reason: String| VoyageError::invalid_input("visibility", reason))
            })
            .transpose()?;

        Ok((status, visibility))
    }
}

/// Parameters for creating a day, optionally at a specific position.
///
/// The day payload is loose client JSON; embedded `events` are created
/// along with the day in the same transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateDay {
    /// Trip the day belongs to
    pub trip_id: String,
    /// The acting user (must own the trip)
    pub user_id: String,
    /// Loose day payload (object with `date`, `title`, `events`, ...)
    pub day: Value,
    /// Position to insert at (0-indexed, clamped; `None` appends)
    pub position: Option<i64>,
}

/// Parameters for creating one or more events on a day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateEvents {
    /// Trip the events belong to
    pub trip_id: String,
    /// The acting user (must own the trip)
    pub user_id: String,
    /// Day the events are scheduled on
    pub day_id: String,
    /// Loose event payloads, inserted in the given order
    pub events: Vec<Value>,
    /// Position to insert at (0-indexed, clamped; `None` appends)
    pub position: Option<i64>,
}

impl CreateEvents {
    /// Validates that at least one event payload is present.
    ///
    /// # Errors
    ///
    /// * `VoyageError::InvalidInput` - the event list is empty
    pub fn validate(&self) -> Result<()> {
        if self.events.is_empty() {
            return Err(VoyageError::invalid_input(
                "events",
                "At least one event is required",
            ));
        }
        Ok(())
    }
}

/// Parameters for updating an event with a partial payload.
///
/// The payload is merged over the stored row; an `options` array replaces
/// the card's children wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEvent {
    /// Trip the event belongs to
    pub trip_id: String,
    /// The acting user (must own the trip)
    pub user_id: String,
    /// Event to update
    pub event_id: String,
    /// Loose partial event payload
    pub event: Value,
}

/// Parameters for deleting an event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteEvent {
    /// Trip the event belongs to
    pub trip_id: String,
    /// The acting user (must own the trip)
    pub user_id: String,
    /// Event to delete
    pub event_id: String,
}

/// Parameters for overwriting a day's event order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReorderEvents {
    /// Trip the day belongs to
    pub trip_id: String,
    /// The acting user (must own the trip)
    pub user_id: String,
    /// Day whose events are reordered
    pub day_id: String,
    /// Complete new ordering of the day's top-level event ids
    pub order: Vec<String>,
}

impl ReorderEvents {
    /// Validates that the ordering is non-empty and free of duplicates.
    ///
    /// # Errors
    ///
    /// * `VoyageError::InvalidInput` - empty list or duplicate ids
    pub fn validate(&self) -> Result<()> {
        if self.order.is_empty() {
            return Err(VoyageError::invalid_input(
                "order",
                "Event order cannot be empty",
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for id in &self.order {
            if !seen.insert(id.as_str()) {
                return Err(VoyageError::invalid_input(
                    "order",
                    format!("Duplicate event id in order: {id}"),
                ));
            }
        }
        Ok(())
    }
}

/// Parameters for assembling the schedule view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetSchedule {
    /// Trip to assemble
    pub trip_id: String,
    /// The viewing user, if any; gates non-public trips and sensitive
    /// fields
    pub user_id: Option<String>,
    /// Restrict to one day, addressed by day id or `YYYY-MM-DD` date
    pub day_id: Option<String>,
    /// Restrict to one event
    pub event_id: Option<String>,
    /// Raw field-selection schema JSON (takes precedence over `template`)
    pub schema: Option<String>,
    /// Built-in template name (`card`, `detail`, `edit`)
    pub template: Option<String>,
    /// Whether to include the projected trip object in the result
    #[serde(default)]
    pub include_trip: bool,
}

/// Parameters for computing trip progress.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetProgress {
    /// Trip to aggregate
    pub trip_id: String,
    /// The viewing user, if any
    pub user_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_trip_requires_title() {
        let params = CreateTrip {
            user_id: "u1".to_string(),
            title: "  ".to_string(),
            ..Default::default()
        };

        match params.validate().unwrap_err() {
            VoyageError::InvalidInput { field, .. } => assert_eq!(field, "title"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn create_trip_parses_status_and_visibility() {
        let params = CreateTrip {
            user_id: "u1".to_string(),
            title: "Hangzhou".to_string(),
            status: Some("published".to_string()),
            visibility: Some("public".to_string()),
            ..Default::default()
        };

        let (status, visibility) = params.validate().unwrap();
        assert_eq!(status, TripStatus::Published);
        assert_eq!(visibility, Visibility::Public);
    }

    #[test]
    fn create_trip_defaults_to_private_draft() {
        let params = CreateTrip {
            user_id: "u1".to_string(),
            title: "Hangzhou".to_string(),
            ..Default::default()
        };

        let (status, visibility) = params.validate().unwrap();
        assert_eq!(status, TripStatus::Draft);
        assert_eq!(visibility, Visibility::Private);
    }

    #[test]
    fn update_trip_rejects_bad_visibility() {
        let params = UpdateTrip {
            trip_id: "t1".to_string(),
            user_id: "u1".to_string(),
            visibility: Some("everyone".to_string()),
            ..Default::default()
        };

        match params.validate().unwrap_err() {
            VoyageError::InvalidInput { field, .. } => assert_eq!(field, "visibility"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn reorder_rejects_duplicates_and_empty() {
        let mut params = ReorderEvents {
            trip_id: "t1".to_string(),
            user_id: "u1".to_string(),
            day_id: "d1".to_string(),
            order: vec![],
        };
        assert!(params.validate().is_err());

        params.order = vec!["e1".to_string(), "e2".to_string(), "e1".to_string()];
        assert!(params.validate().is_err());

        params.order = vec!["e1".to_string(), "e2".to_string()];
        assert!(params.validate().is_ok());
    }

    #[test]
    fn create_events_requires_payloads() {
        let params = CreateEvents {
            trip_id: "t1".to_string(),
            user_id: "u1".to_string(),
            day_id: "d1".to_string(),
            events: vec![],
            position: None,
        };
        assert!(params.validate().is_err());
    }
}
