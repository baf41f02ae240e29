//! Event model definition and related functionality.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{CardType, EventState};

/// A scheduled activity within a day.
///
/// Top-level events (`parent_event_id` is `None`) appear directly in a
/// day's schedule; child events belong to a multi-option card and only
/// surface nested under their parent as `options`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique identifier for the event
    pub id: String,

    /// ID of the owning day
    pub day_id: String,

    /// ID of the owning trip (denormalized for query efficiency)
    pub trip_id: String,

    /// Display order within the day (0-indexed, contiguous among siblings)
    #[serde(rename = "eventOrder")]
    pub order: u32,

    /// Open-vocabulary activity kind (`activity`, `scenic`, `food`, ...)
    #[serde(rename = "type")]
    pub kind: String,

    /// Lifecycle state
    pub state: EventState,

    /// Single entry or multi-option card
    pub card_type: CardType,

    /// Short title shown on the card
    pub title: Option<String>,

    /// One-line description
    pub description: Option<String>,

    /// Long-form detail text
    pub detail: Option<String>,

    /// Start time string, e.g. "09:30"
    pub start_time: Option<String>,

    /// End time string
    pub end_time: Option<String>,

    /// Planned duration in minutes
    pub duration_min: Option<i64>,

    /// Display priority (higher sorts more prominently in some views)
    pub priority: i64,

    /// Reference to a shared location row, if any
    pub location_id: Option<String>,

    /// Denormalized location name for display without a join
    pub location_name: Option<String>,

    /// Tag list (JSON array in storage; `null` when absent/unparseable)
    pub tags: Value,

    /// Image URL list (JSON array in storage)
    pub images: Value,

    /// Estimated cost
    pub cost: Option<f64>,

    /// Currency of `cost`
    pub cost_currency: String,

    /// Owning multi-option card, when this row is a child option
    pub parent_event_id: Option<String>,

    /// Opaque weather payload, passed through verbatim
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub weather: Value,

    /// Creation time (epoch milliseconds)
    pub created_at: i64,

    /// Last update time (epoch milliseconds)
    pub updated_at: i64,

    /// Alternative sub-events, populated for multi-option cards
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<Event>,
}

impl Event {
    /// True when this event bundles alternative options.
    pub fn is_multi(&self) -> bool {
        self.card_type == CardType::Multi
    }

    /// True when this event is a child option of a multi card.
    pub fn is_child(&self) -> bool {
        self.parent_event_id.is_some()
    }
}
