//! Schedule assembly and progress operations for the Planner.

use tokio::task;

use super::Planner;
use crate::{
    db::{
        schedule_queries::{ScheduleData, ScheduleQuery},
        Database,
    },
    error::{Result, VoyageError},
    params::{GetProgress, GetSchedule},
    schema::ProjectionSchema,
};

impl Planner {
    /// Assembles the schedule view of a trip, subject to read access.
    ///
    /// The effective projection schema comes from the raw schema JSON when
    /// provided (malformed JSON is ignored), otherwise from the named
    /// template, otherwise from the `card` template.
    pub async fn get_schedule(&self, params: &GetSchedule) -> Result<ScheduleData> {
        let schema = ProjectionSchema::resolve(params.schema.as_deref(), params.template.as_deref());
        let db_path = self.db_path.clone();
        let params = params.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            let is_owner = db.ensure_trip_readable(&params.trip_id, params.user_id.as_deref())?;
            db.assemble_schedule(&ScheduleQuery {
                trip_id: &params.trip_id,
                day_ref: params.day_id.as_deref(),
                event_id: params.event_id.as_deref(),
                schema: &schema,
                include_trip: params.include_trip,
                is_owner,
            })
        })
        .await
        .map_err(|e| VoyageError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Computes a trip's completion percentage, subject to read access.
    ///
    /// Access failures propagate; aggregation failures degrade to 0 so a
    /// progress badge never takes the whole view down.
    pub async fn get_progress(&self, params: &GetProgress) -> Result<u8> {
        let db_path = self.db_path.clone();
        let params = params.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.ensure_trip_readable(&params.trip_id, params.user_id.as_deref())?;
            Ok(db.trip_progress(&params.trip_id).unwrap_or_else(|e| {
                log::warn!("progress aggregation failed for trip {}: {e}", params.trip_id);
                0
            }))
        })
        .await
        .map_err(|e| VoyageError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
