//! Trip operations for the Planner.

use tokio::task;

use super::Planner;
use crate::{
    db::Database,
    error::{Result, VoyageError},
    models::Trip,
    params::{CreateTrip, Id, UpdateTrip},
};

impl Planner {
    /// Creates a new trip owned by the requesting user.
    pub async fn create_trip(&self, params: &CreateTrip) -> Result<Trip> {
        let (status, visibility) = params.validate()?;
        let db_path = self.db_path.clone();
        let params = params.clone();
        let trip_id = self.ids.next_trip_id();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.create_trip(&trip_id, &params, status, visibility)
        })
        .await
        .map_err(|e| VoyageError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Retrieves a trip. The owner always may read it; everyone else only
    /// when it is published and public.
    pub async fn get_trip(&self, trip_id: &str, user_id: Option<&str>) -> Result<Trip> {
        let db_path = self.db_path.clone();
        let trip_id = trip_id.to_string();
        let user_id = user_id.map(str::to_string);

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.ensure_trip_readable(&trip_id, user_id.as_deref())?;
            db.get_trip(&trip_id)?
                .ok_or(VoyageError::TripNotFound { id: trip_id })
        })
        .await
        .map_err(|e| VoyageError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Lists the user's own trips, most recently updated first.
    pub async fn list_trips(&self, user_id: &str) -> Result<Vec<Trip>> {
        let db_path = self.db_path.clone();
        let user_id = user_id.to_string();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.list_trips(&user_id)
        })
        .await
        .map_err(|e| VoyageError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Applies a partial update to an owned trip.
    pub async fn update_trip(&self, params: &UpdateTrip) -> Result<Trip> {
        let (status, visibility) = params.validate()?;
        let db_path = self.db_path.clone();
        let params = params.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.ensure_trip_owner(&params.trip_id, &params.user_id)?;
            db.update_trip(&params, status, visibility)
        })
        .await
        .map_err(|e| VoyageError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Soft-deletes an owned trip.
    pub async fn delete_trip(&self, params: &Id) -> Result<()> {
        let db_path = self.db_path.clone();
        let params = params.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.ensure_trip_owner(&params.id, &params.user_id)?;
            db.delete_trip(&params.id)
        })
        .await
        .map_err(|e| VoyageError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
