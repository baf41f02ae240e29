//! Day operations for the Planner.

use tokio::task;

use super::Planner;
use crate::{
    db::Database,
    error::{Result, VoyageError},
    models::Day,
    normalize::normalize_day,
    params::CreateDay,
};

/// Result of a day creation: the day plus whether it already existed.
#[derive(Debug, Clone)]
pub struct CreatedDay {
    pub day: Day,
    pub existed: bool,
}

impl Planner {
    /// Creates a day in an owned trip, optionally at a specific position,
    /// along with any events embedded in the payload. Idempotent on the
    /// day id.
    pub async fn create_day(&self, params: &CreateDay) -> Result<CreatedDay> {
        let day = normalize_day(&params.day, &self.ids)
            .ok_or_else(|| VoyageError::invalid_input("day", "Invalid day payload"))?;

        let db_path = self.db_path.clone();
        let trip_id = params.trip_id.clone();
        let user_id = params.user_id.clone();
        let position = params.position;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.ensure_trip_owner(&trip_id, &user_id)?;
            let (day, existed) = db.create_day(&trip_id, &day, position)?;
            if existed {
                log::debug!("day {} already exists in trip {trip_id}", day.id);
            }
            Ok(CreatedDay { day, existed })
        })
        .await
        .map_err(|e| VoyageError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Lists a trip's days in order, subject to read access.
    pub async fn list_days(&self, trip_id: &str, user_id: Option<&str>) -> Result<Vec<Day>> {
        let db_path = self.db_path.clone();
        let trip_id = trip_id.to_string();
        let user_id = user_id.map(str::to_string);

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.ensure_trip_readable(&trip_id, user_id.as_deref())?;
            db.list_days(&trip_id)
        })
        .await
        .map_err(|e| VoyageError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
