//! Core library for the Voyage itinerary engine.
//!
//! This crate provides the business logic for composing travel itineraries
//! and projecting them into client-shaped schedule views: trip, day, and
//! event management, ordering, schema-driven field selection, and progress
//! aggregation, backed by SQLite.
//!
//! # Architecture
//!
//! - **Write side** ([`models`], [`normalize`]): loose client JSON payloads
//!   are canonicalized into typed models before they touch storage.
//! - **Read side** ([`schema`], [`db`]): the schedule view is assembled
//!   from dynamic projections — clients pick fields per entity, and rows
//!   come back as `serde_json` objects keyed by client field names.
//! - **Display** ([`display`]): domain models implement
//!   [`std::fmt::Display`] producing markdown for rich terminal rendering;
//!   wrapper types format collections and operation results.
//!
//! # Quick Start
//!
//! ```rust
//! use voyage_core::{params::CreateTrip, PlannerBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create a planner instance
//! let planner = PlannerBuilder::new()
//!     .with_database_path(Some("test.db"))
//!     .build()
//!     .await?;
//!
//! // Create a new trip using planner methods
//! let trip = planner
//!     .create_trip(&CreateTrip {
//!         user_id: "u1".to_string(),
//!         title: "Hangzhou Weekend".to_string(),
//!         start_date: Some("2026-03-07".to_string()),
//!         end_date: Some("2026-03-08".to_string()),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("Created trip: {}", trip);
//!
//! // List the user's trips
//! let trips = planner.list_trips("u1").await?;
//! for trip in &trips {
//!     println!("Trip: {}", trip.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod display;
pub mod error;
pub mod idgen;
pub mod models;
pub mod normalize;
pub mod params;
pub mod planner;
pub mod progress;
pub mod schema;

// Re-export commonly used types
pub use db::schedule_queries::{ScheduleData, ScheduleQuery};
pub use db::Database;
pub use display::{CreateResult, Days, DeleteResult, Events, OperationStatus, Trips, UpdateResult};
pub use error::{Result, VoyageError};
pub use idgen::IdGenerator;
pub use models::{
    CardType, Day, DurationParts, Event, EventState, JsonColumn, Location, Trip, TripStatus,
    Visibility,
};
pub use normalize::{normalize_day, normalize_event, CanonicalDay, CanonicalEvent};
pub use params::{
    CreateDay, CreateEvents, CreateTrip, DeleteEvent, GetProgress, GetSchedule, Id, ReorderEvents,
    UpdateEvent, UpdateTrip,
};
pub use planner::day_ops::CreatedDay;
pub use planner::{Planner, PlannerBuilder};
pub use schema::{FieldSelection, ProjectionSchema};
