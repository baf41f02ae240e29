//! High-level itinerary API for managing trips, days, and events.
//!
//! This module provides the main [`Planner`] interface of the Voyage
//! engine. The planner coordinates between interface layers and the
//! database, implementing the business logic for every operation: trip
//! CRUD, day and event composition, ordering, schedule assembly, and
//! progress aggregation.
//!
//! # Architecture Overview
//!
//! Each operation clones the configured database path, hops onto a
//! blocking thread via `tokio::task::spawn_blocking`, opens a fresh
//! [`crate::db::Database`] connection, and runs synchronous SQLite work
//! there. Connections are cheap to open and never cross threads, which
//! keeps the async surface `Send` without a connection pool.
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for creating [`Planner`] instances with configuration
//! - [`trip_ops`]: Trip CRUD and ownership-gated access
//! - [`day_ops`]: Day creation and listing
//! - [`event_ops`]: Event writes, deletes, and reordering
//! - [`schedule_ops`]: Schedule assembly and progress aggregation
//!
//! # Usage Examples
//!
//! ```rust
//! use voyage_core::{PlannerBuilder, params::CreateTrip};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new().build().await?;
//!
//! let trip = planner
//!     .create_trip(&CreateTrip {
//!         user_id: "u1".to_string(),
//!         title: "Hangzhou Weekend".to_string(),
//!         start_date: Some("2026-03-07".to_string()),
//!         end_date: Some("2026-03-08".to_string()),
//!         ..Default::default()
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use crate::idgen::IdGenerator;

// Module declarations
pub mod builder;
pub mod day_ops;
pub mod event_ops;
pub mod schedule_ops;
pub mod trip_ops;

#[cfg(test)]
mod tests;

// Re-export the main types
pub use builder::PlannerBuilder;

/// Main itinerary interface for managing trips, days, and events.
pub struct Planner {
    pub(crate) db_path: PathBuf,
    pub(crate) ids: Arc<IdGenerator>,
}

impl Planner {
    /// Creates a new planner with the specified database path.
    pub(crate) fn new(db_path: PathBuf) -> Self {
        Self {
            db_path,
            ids: Arc::new(IdGenerator::new()),
        }
    }
}
