//! Status enumerations for trips and events.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Who can see a trip.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Only the owner can read the trip
    #[default]
    Private,

    /// Anyone can read the trip once it is published
    Public,

    /// Readable by anyone holding a share link
    Link,
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "private" => Ok(Visibility::Private),
            "public" => Ok(Visibility::Public),
            "link" => Ok(Visibility::Link),
            _ => Err(format!("Invalid visibility: {s}")),
        }
    }
}

impl Visibility {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Public => "public",
            Visibility::Link => "link",
        }
    }
}

/// Editorial status of a trip.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    /// Still being composed by the owner
    #[default]
    Draft,

    /// Published; visible to non-owners subject to visibility
    Published,
}

impl FromStr for TripStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(TripStatus::Draft),
            "published" => Ok(TripStatus::Published),
            _ => Err(format!("Invalid trip status: {s}")),
        }
    }
}

impl TripStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Draft => "draft",
            TripStatus::Published => "published",
        }
    }
}

/// Lifecycle state of a scheduled event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventState {
    /// Planned and still pending
    #[default]
    Active,

    /// Done; counts toward trip progress
    Completed,

    /// Deselected alternative of a multi-option card. An inactive child
    /// counts as settled for progress purposes; an inactive top-level
    /// event does not.
    Inactive,
}

impl FromStr for EventState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(EventState::Active),
            "completed" => Ok(EventState::Completed),
            "inactive" => Ok(EventState::Inactive),
            _ => Err(format!("Invalid event state: {s}")),
        }
    }
}

impl EventState {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            EventState::Active => "active",
            EventState::Completed => "completed",
            EventState::Inactive => "inactive",
        }
    }

    /// Get the state with a visual icon for display
    pub fn with_icon(&self) -> &'static str {
        match self {
            EventState::Active => "○ Active",
            EventState::Completed => "✓ Completed",
            EventState::Inactive => "✗ Inactive",
        }
    }
}

/// Whether an event is a plain entry or a multi-option card.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    /// A single scheduled entry
    #[default]
    Single,

    /// A card bundling alternative sub-events as `options`
    Multi,
}

impl FromStr for CardType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" => Ok(CardType::Single),
            "multi" => Ok(CardType::Multi),
            _ => Err(format!("Invalid card type: {s}")),
        }
    }
}

impl CardType {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Single => "single",
            CardType::Multi => "multi",
        }
    }
}
