//! Day CRUD operations and day-reference resolution.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};

use crate::{
    db::ordering::{self, OrderScope},
    error::{DatabaseResultExt, Result},
    models::Day,
    normalize::CanonicalDay,
};

const SELECT_DAY_SQL: &str = "SELECT day_id, trip_id, day_order, date, short_date, location, title, description, cover_image, created_at, updated_at FROM day WHERE trip_id = ?1 AND day_id = ?2";
const SELECT_DAYS_BY_TRIP_SQL: &str = "SELECT day_id, trip_id, day_order, date, short_date, location, title, description, cover_image, created_at, updated_at FROM day WHERE trip_id = ?1 ORDER BY day_order ASC";
const INSERT_DAY_SQL: &str = "INSERT INTO day (day_id, trip_id, day_order, date, short_date, location, title, description, cover_image, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";
const SELECT_DAY_ID_BY_DATE_SQL: &str =
    "SELECT day_id FROM day WHERE trip_id = ?1 AND date = ?2";
const SELECT_DAY_ID_BY_INDEX_SQL: &str =
    "SELECT day_id FROM day WHERE trip_id = ?1 ORDER BY day_order ASC LIMIT 1 OFFSET ?2";
const SELECT_DAY_ID_SQL: &str = "SELECT day_id FROM day WHERE trip_id = ?1 AND day_id = ?2";

impl super::Database {
    /// Helper function to construct a Day from a database row
    fn build_day_from_row(row: &rusqlite::Row) -> rusqlite::Result<Day> {
        Ok(Day {
            id: row.get(0)?,
            trip_id: row.get(1)?,
            order: row.get::<_, i64>(2)? as u32,
            date: row.get(3)?,
            short_date: row.get(4)?,
            location: row.get(5)?,
            title: row.get(6)?,
            description: row.get(7)?,
            cover_image: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }

    /// Creates a day in a trip, optionally at a specific position, along
    /// with any events embedded in the payload.
    ///
    /// Creation is idempotent on the day id: if the day already exists the
    /// stored row is returned with `existed = true` and nothing changes.
    pub fn create_day(
        &mut self,
        trip_id: &str,
        day: &CanonicalDay,
        position: Option<i64>,
    ) -> Result<(Day, bool)> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let existing = tx
            .query_row(SELECT_DAY_SQL, params![trip_id, &day.id], Self::build_day_from_row)
            .optional()
            .db_context("Failed to check day existence")?;
        if let Some(existing) = existing {
            return Ok((existing, true));
        }

        let scope = OrderScope::Days { trip_id };
        let count = ordering::count(&tx, scope)?;
        let day_order = ordering::clamp_position(position, count);
        if day_order < count {
            ordering::open_gap(&tx, scope, day_order, 1)?;
        }

        // Dates may arrive with trailing text; only the YYYY-MM-DD prefix
        // is stored.
        let pure_date = day
            .date
            .as_deref()
            .map(|d| d.chars().take(10).collect::<String>());

        let now = Timestamp::now().as_millisecond();
        tx.execute(
            INSERT_DAY_SQL,
            params![
                &day.id,
                trip_id,
                day_order,
                pure_date,
                day.short_date.as_deref(),
                day.location.as_deref(),
                day.title.as_deref(),
                day.description.as_deref(),
                day.cover_image.as_deref(),
                now,
                now
            ],
        )
        .db_context("Failed to insert day")?;

        for (order, event) in day.events.iter().enumerate() {
            Self::insert_canonical_event_tx(&tx, trip_id, &day.id, event, order as i64, None, now)?;
        }

        Self::touch_trip(&tx, trip_id)?;
        tx.commit().db_context("Failed to commit transaction")?;

        Ok((
            Day {
                id: day.id.clone(),
                trip_id: trip_id.to_string(),
                order: day_order as u32,
                date: pure_date,
                short_date: day.short_date.clone(),
                location: day.location.clone(),
                title: day.title.clone(),
                description: day.description.clone(),
                cover_image: day.cover_image.clone(),
                created_at: now,
                updated_at: now,
            },
            false,
        ))
    }

    /// Retrieves a single day.
    pub fn get_day(&self, trip_id: &str, day_id: &str) -> Result<Option<Day>> {
        self.connection
            .query_row(SELECT_DAY_SQL, params![trip_id, day_id], Self::build_day_from_row)
            .optional()
            .db_context("Failed to get day")
    }

    /// Retrieves all days of a trip in order.
    pub fn list_days(&self, trip_id: &str) -> Result<Vec<Day>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_DAYS_BY_TRIP_SQL)
            .db_context("Failed to prepare day list query")?;

        let days = stmt
            .query_map(params![trip_id], Self::build_day_from_row)
            .db_context("Failed to query days")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch days")?;
        Ok(days)
    }

    /// Resolves a loose day reference to a stored day id.
    ///
    /// References may be a `YYYY-MM-DD` date, a 0-based day index, or a
    /// day id. Returns `None` when nothing matches.
    pub fn resolve_day_id(&self, trip_id: &str, reference: &str) -> Result<Option<String>> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Ok(None);
        }

        if reference.contains('-') {
            return self
                .connection
                .query_row(SELECT_DAY_ID_BY_DATE_SQL, params![trip_id, reference], |row| {
                    row.get(0)
                })
                .optional()
                .db_context("Failed to resolve day by date");
        }

        // A small numeral is a day index; a day id also parses as a number
        // but lands far past the day count, so the index probe misses and
        // the direct lookup below takes over.
        if let Ok(index) = reference.parse::<i64>() {
            let by_index: Option<String> = self
                .connection
                .query_row(SELECT_DAY_ID_BY_INDEX_SQL, params![trip_id, index], |row| {
                    row.get(0)
                })
                .optional()
                .db_context("Failed to resolve day by index")?;
            if by_index.is_some() {
                return Ok(by_index);
            }
        }

        self.connection
            .query_row(SELECT_DAY_ID_SQL, params![trip_id, reference], |row| row.get(0))
            .optional()
            .db_context("Failed to resolve day by id")
    }
}
