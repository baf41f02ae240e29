//! Trip CRUD operations and ownership checks.

use jiff::Timestamp;
use rusqlite::{params, types::Type, OptionalExtension};

use crate::{
    error::{DatabaseResultExt, Result, VoyageError},
    models::{JsonColumn, Trip, TripStatus, Visibility},
    params::{CreateTrip, UpdateTrip},
};

const INSERT_TRIP_SQL: &str = "INSERT INTO trip (trip_id, user_id, title, description, start_date, end_date, days, city_list, cover_image, status, visibility, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)";
const SELECT_TRIP_SQL: &str = "SELECT trip_id, user_id, title, description, start_date, end_date, days, city_list, cover_image, status, visibility, created_at, updated_at FROM trip WHERE trip_id = ?1 AND is_deleted = 0";
const SELECT_TRIPS_BY_USER_SQL: &str = "SELECT trip_id, user_id, title, description, start_date, end_date, days, city_list, cover_image, status, visibility, created_at, updated_at FROM trip WHERE user_id = ?1 AND is_deleted = 0 ORDER BY updated_at DESC";
const SELECT_TRIP_OWNER_SQL: &str =
    "SELECT user_id FROM trip WHERE trip_id = ?1 AND is_deleted = 0";
const SELECT_TRIP_ACCESS_SQL: &str =
    "SELECT user_id, status, visibility FROM trip WHERE trip_id = ?1 AND is_deleted = 0";
const UPDATE_TRIP_TIMESTAMP_SQL: &str = "UPDATE trip SET updated_at = ?1 WHERE trip_id = ?2";
const SOFT_DELETE_TRIP_SQL: &str =
    "UPDATE trip SET is_deleted = 1, deleted_at = ?1, updated_at = ?1 WHERE trip_id = ?2 AND is_deleted = 0";
const SELECT_PROGRESS_ROWS_SQL: &str =
    "SELECT event_id, parent_event_id, state FROM event WHERE trip_id = ?1 AND is_deleted = 0";

impl super::Database {
    /// Helper function to construct a Trip from a database row. The
    /// derived `completed` percentage starts at 0 and is filled in by the
    /// caller.
    fn build_trip_from_row(row: &rusqlite::Row) -> rusqlite::Result<Trip> {
        let status_str: String = row.get(9)?;
        let status = status_str.parse::<TripStatus>().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                9,
                Type::Text,
                format!("Invalid trip status: {status_str}").into(),
            )
        })?;

        let visibility_str: String = row.get(10)?;
        let visibility = visibility_str.parse::<Visibility>().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                10,
                Type::Text,
                format!("Invalid visibility: {visibility_str}").into(),
            )
        })?;

        Ok(Trip {
            id: row.get(0)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            start_date: row.get(4)?,
            end_date: row.get(5)?,
            days: row.get(6)?,
            city_list: JsonColumn::from_storage(row.get(7)?).to_value(),
            cover_image: row.get(8)?,
            status,
            visibility,
            completed: 0,
            created_at: row.get(11)?,
            updated_at: row.get(12)?,
        })
    }

    /// Creates a new trip owned by `params.user_id`.
    pub fn create_trip(
        &mut self,
        trip_id: &str,
        params: &CreateTrip,
        status: TripStatus,
        visibility: Visibility,
    ) -> Result<Trip> {
        let now = Timestamp::now().as_millisecond();
        let city_list = JsonColumn::from_value(params.city_list.as_ref());

        self.connection
            .execute(
                INSERT_TRIP_SQL,
                params![
                    trip_id,
                    &params.user_id,
                    &params.title,
                    params.description.as_deref(),
                    params.start_date.as_deref(),
                    params.end_date.as_deref(),
                    params.days.unwrap_or(0),
                    city_list.to_storage(),
                    params.cover_image.as_deref(),
                    status.as_str(),
                    visibility.as_str(),
                    now,
                    now
                ],
            )
            .db_context("Failed to insert trip")?;

        Ok(Trip {
            id: trip_id.to_string(),
            user_id: params.user_id.clone(),
            title: params.title.clone(),
            description: params.description.clone(),
            start_date: params.start_date.clone(),
            end_date: params.end_date.clone(),
            days: params.days.unwrap_or(0),
            city_list: city_list.to_value(),
            cover_image: params.cover_image.clone(),
            status,
            visibility,
            completed: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Retrieves a trip by id, with the derived completion percentage.
    pub fn get_trip(&self, trip_id: &str) -> Result<Option<Trip>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_TRIP_SQL)
            .db_context("Failed to prepare trip query")?;

        let trip = stmt
            .query_row(params![trip_id], Self::build_trip_from_row)
            .optional()
            .db_context("Failed to get trip")?;

        Ok(trip.map(|mut trip| {
            trip.completed = self.trip_progress(trip_id).unwrap_or(0);
            trip
        }))
    }

    /// Lists a user's trips, most recently updated first.
    pub fn list_trips(&self, user_id: &str) -> Result<Vec<Trip>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_TRIPS_BY_USER_SQL)
            .db_context("Failed to prepare trip list query")?;

        let mut trips = stmt
            .query_map(params![user_id], Self::build_trip_from_row)
            .db_context("Failed to query trips")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch trips")?;

        for trip in &mut trips {
            trip.completed = self.trip_progress(&trip.id).unwrap_or(0);
        }
        Ok(trips)
    }

    /// Applies a partial update to a trip and returns the updated row.
    pub fn update_trip(
        &mut self,
        update: &UpdateTrip,
        status: Option<TripStatus>,
        visibility: Option<Visibility>,
    ) -> Result<Trip> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let current = tx
            .query_row(SELECT_TRIP_SQL, params![&update.trip_id], Self::build_trip_from_row)
            .optional()
            .db_context("Failed to get current trip")?
            .ok_or_else(|| VoyageError::TripNotFound {
                id: update.trip_id.clone(),
            })?;

        let city_list = match &update.city_list {
            Some(value) => JsonColumn::from_value(Some(value)),
            None => JsonColumn::from_value(Some(&current.city_list)),
        };
        let now = Timestamp::now().as_millisecond();

        let title = update.title.clone().unwrap_or(current.title);
        let description = update.description.clone().or(current.description);
        let start_date = update.start_date.clone().or(current.start_date);
        let end_date = update.end_date.clone().or(current.end_date);
        let days = update.days.unwrap_or(current.days);
        let cover_image = update.cover_image.clone().or(current.cover_image);
        let status = status.unwrap_or(current.status);
        let visibility = visibility.unwrap_or(current.visibility);

        tx.execute(
            "UPDATE trip SET title = ?1, description = ?2, start_date = ?3, end_date = ?4, \
             days = ?5, city_list = ?6, cover_image = ?7, status = ?8, visibility = ?9, \
             updated_at = ?10 WHERE trip_id = ?11",
            params![
                &title,
                &description,
                &start_date,
                &end_date,
                days,
                city_list.to_storage(),
                &cover_image,
                status.as_str(),
                visibility.as_str(),
                now,
                &update.trip_id
            ],
        )
        .db_context("Failed to update trip")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Trip {
            id: update.trip_id.clone(),
            user_id: current.user_id,
            title,
            description,
            start_date,
            end_date,
            days,
            city_list: city_list.to_value(),
            cover_image,
            status,
            visibility,
            completed: self.trip_progress(&update.trip_id).unwrap_or(0),
            created_at: current.created_at,
            updated_at: now,
        })
    }

    /// Soft-deletes a trip. The row and its days/events stay in storage
    /// but disappear from every query.
    pub fn delete_trip(&mut self, trip_id: &str) -> Result<()> {
        let now = Timestamp::now().as_millisecond();
        let changed = self
            .connection
            .execute(SOFT_DELETE_TRIP_SQL, params![now, trip_id])
            .db_context("Failed to delete trip")?;

        if changed == 0 {
            return Err(VoyageError::TripNotFound {
                id: trip_id.to_string(),
            });
        }
        Ok(())
    }

    /// Verifies that the trip exists and is owned by `user_id`.
    ///
    /// # Errors
    ///
    /// * `VoyageError::TripNotFound` - no live trip with that id
    /// * `VoyageError::PermissionDenied` - the trip belongs to someone else
    pub fn ensure_trip_owner(&self, trip_id: &str, user_id: &str) -> Result<()> {
        let owner: Option<String> = self
            .connection
            .query_row(SELECT_TRIP_OWNER_SQL, params![trip_id], |row| row.get(0))
            .optional()
            .db_context("Failed to query trip owner")?;

        match owner {
            None => Err(VoyageError::TripNotFound {
                id: trip_id.to_string(),
            }),
            Some(owner) if owner == user_id => Ok(()),
            Some(_) => Err(VoyageError::permission_denied(format!(
                "Trip {trip_id} is not owned by the requesting user"
            ))),
        }
    }

    /// Verifies read access: the owner always may read; everyone else only
    /// when the trip is published and public. Returns whether the viewer
    /// is the owner.
    pub fn ensure_trip_readable(&self, trip_id: &str, user_id: Option<&str>) -> Result<bool> {
        let access: Option<(String, String, String)> = self
            .connection
            .query_row(SELECT_TRIP_ACCESS_SQL, params![trip_id], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .optional()
            .db_context("Failed to query trip access")?;

        let (owner, status, visibility) = access.ok_or_else(|| VoyageError::TripNotFound {
            id: trip_id.to_string(),
        })?;

        let is_owner = user_id == Some(owner.as_str());
        if is_owner {
            return Ok(true);
        }

        let public = visibility.parse::<Visibility>() == Ok(Visibility::Public)
            && status.parse::<TripStatus>() == Ok(TripStatus::Published);
        if public {
            Ok(false)
        } else {
            Err(VoyageError::permission_denied(format!(
                "Trip {trip_id} is not publicly readable"
            )))
        }
    }

    /// Touches a trip's `updated_at`.
    pub(super) fn touch_trip(conn: &rusqlite::Connection, trip_id: &str) -> Result<()> {
        let now = Timestamp::now().as_millisecond();
        conn.execute(UPDATE_TRIP_TIMESTAMP_SQL, params![now, trip_id])
            .db_context("Failed to update trip timestamp")?;
        Ok(())
    }

    /// Derived completion percentage for a trip's event hierarchy.
    pub fn trip_progress(&self, trip_id: &str) -> Result<u8> {
        let mut stmt = self
            .connection
            .prepare(SELECT_PROGRESS_ROWS_SQL)
            .db_context("Failed to prepare progress query")?;

        let rows = stmt
            .query_map(params![trip_id], |row| {
                let state: String = row.get(2)?;
                Ok(crate::progress::ProgressRow {
                    id: row.get(0)?,
                    parent_event_id: row.get(1)?,
                    state: state.parse().unwrap_or_default(),
                })
            })
            .db_context("Failed to query progress rows")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch progress rows")?;

        Ok(crate::progress::compute_progress(&rows))
    }
}
