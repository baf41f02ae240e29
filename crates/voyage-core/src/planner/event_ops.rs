//! Event operations for the Planner.

use tokio::task;

use super::Planner;
use crate::{
    db::Database,
    error::{Result, VoyageError},
    models::Event,
    normalize::normalize_event,
    params::{CreateEvents, DeleteEvent, ReorderEvents, UpdateEvent},
};

impl Planner {
    /// Creates one or more events on a day of an owned trip.
    ///
    /// The day may be addressed by id or by `YYYY-MM-DD` date; a date that
    /// matches no stored day is an error. Invalid payloads in the batch
    /// are skipped, matching the tolerant write behavior of the rest of
    /// the API; an entirely invalid batch is rejected.
    pub async fn create_events(&self, params: &CreateEvents) -> Result<Vec<Event>> {
        params.validate()?;

        let events: Vec<_> = params
            .events
            .iter()
            .filter_map(|payload| normalize_event(payload, &self.ids))
            .collect();
        if events.is_empty() {
            return Err(VoyageError::invalid_input(
                "events",
                "No valid event payloads",
            ));
        }

        let db_path = self.db_path.clone();
        let trip_id = params.trip_id.clone();
        let user_id = params.user_id.clone();
        let day_ref = params.day_id.clone();
        let position = params.position;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.ensure_trip_owner(&trip_id, &user_id)?;
            let day_id = db
                .resolve_day_id(&trip_id, &day_ref)?
                .ok_or(VoyageError::DayNotFound { id: day_ref })?;
            db.create_events(&trip_id, &day_id, &events, position)
        })
        .await
        .map_err(|e| VoyageError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Applies a partial payload to an event of an owned trip.
    pub async fn update_event(&self, params: &UpdateEvent) -> Result<Event> {
        let db_path = self.db_path.clone();
        let ids = self.ids.clone();
        let params = params.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.ensure_trip_owner(&params.trip_id, &params.user_id)?;
            db.update_event(&params.trip_id, &params.event_id, &params.event, &ids)
        })
        .await
        .map_err(|e| VoyageError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Soft-deletes an event of an owned trip. Deleting an unknown or
    /// already-deleted event fails with `EventNotFound`.
    pub async fn delete_event(&self, params: &DeleteEvent) -> Result<()> {
        let db_path = self.db_path.clone();
        let params = params.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.ensure_trip_owner(&params.trip_id, &params.user_id)?;
            db.delete_event(&params.trip_id, &params.event_id)
        })
        .await
        .map_err(|e| VoyageError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Overwrites a day's top-level event order.
    pub async fn reorder_events(&self, params: &ReorderEvents) -> Result<()> {
        params.validate()?;
        let db_path = self.db_path.clone();
        let params = params.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.ensure_trip_owner(&params.trip_id, &params.user_id)?;
            let day_id = db
                .resolve_day_id(&params.trip_id, &params.day_id)?
                .ok_or_else(|| VoyageError::DayNotFound {
                    id: params.day_id.clone(),
                })?;
            db.reorder_events(&params.trip_id, &day_id, &params.order)
        })
        .await
        .map_err(|e| VoyageError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Retrieves a single event with its options, subject to read access.
    pub async fn get_event(
        &self,
        trip_id: &str,
        event_id: &str,
        user_id: Option<&str>,
    ) -> Result<Event> {
        let db_path = self.db_path.clone();
        let trip_id = trip_id.to_string();
        let event_id = event_id.to_string();
        let user_id = user_id.map(str::to_string);

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.ensure_trip_readable(&trip_id, user_id.as_deref())?;
            db.get_event_with_options(&trip_id, &event_id)?
                .ok_or(VoyageError::EventNotFound { id: event_id })
        })
        .await
        .map_err(|e| VoyageError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
