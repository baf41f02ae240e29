//! Event CRUD operations: positional inserts, merge updates, option
//! replacement, soft deletes, and reordering.
//!
//! Every write path that touches ordering runs inside one transaction, so
//! a crash can never leave the order shifted without the insert or delete
//! that motivated it.

use jiff::Timestamp;
use rusqlite::{params, types::Type, Connection, OptionalExtension};
use serde_json::Value;

use crate::{
    db::ordering::{self, OrderScope},
    error::{DatabaseResultExt, Result, VoyageError},
    idgen::IdGenerator,
    models::{CardType, Event, EventState, JsonColumn},
    normalize::{normalize_event, CanonicalEvent},
};

const EVENT_COLUMNS: &str = "event_id, day_id, trip_id, event_order, type, state, card_type, title, description, detail, start_time, end_time, duration_min, priority, location_id, location_name, tags, images, cost, cost_currency, parent_event_id, weather_json, created_at, updated_at";

const INSERT_EVENT_SQL: &str = "INSERT INTO event (event_id, day_id, trip_id, event_order, type, state, card_type, title, description, detail, start_time, end_time, duration_min, priority, location_id, location_name, tags, images, cost, cost_currency, parent_event_id, weather_json, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24)";
const UPDATE_EVENT_SQL: &str = "UPDATE event SET type = ?1, state = ?2, card_type = ?3, title = ?4, description = ?5, detail = ?6, start_time = ?7, end_time = ?8, duration_min = ?9, priority = ?10, location_id = ?11, location_name = ?12, tags = ?13, images = ?14, cost = ?15, cost_currency = ?16, weather_json = ?17, is_deleted = 0, deleted_at = NULL, updated_at = ?18 WHERE trip_id = ?19 AND event_id = ?20";
const SELECT_EVENT_POSITION_SQL: &str = "SELECT day_id, event_order, parent_event_id FROM event WHERE trip_id = ?1 AND event_id = ?2 AND is_deleted = 0";
const SOFT_DELETE_EVENT_SQL: &str = "UPDATE event SET is_deleted = 1, deleted_at = ?1, updated_at = ?1 WHERE trip_id = ?2 AND event_id = ?3";
const DELETE_CHILD_EVENTS_SQL: &str = "DELETE FROM event WHERE parent_event_id = ?1";
const TOUCH_DAY_EVENTS_SQL: &str = "UPDATE event SET updated_at = ?1 WHERE trip_id = ?2 AND day_id = ?3 AND parent_event_id IS NULL AND is_deleted = 0";

impl super::Database {
    /// Helper function to construct an Event from a database row selecting
    /// [`EVENT_COLUMNS`].
    pub(super) fn build_event_from_row(row: &rusqlite::Row) -> rusqlite::Result<Event> {
        let state_str: String = row.get(5)?;
        let state = state_str.parse::<EventState>().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                Type::Text,
                format!("Invalid event state: {state_str}").into(),
            )
        })?;

        let card_type_str: String = row.get(6)?;
        let card_type = card_type_str.parse::<CardType>().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                6,
                Type::Text,
                format!("Invalid card type: {card_type_str}").into(),
            )
        })?;

        Ok(Event {
            id: row.get(0)?,
            day_id: row.get(1)?,
            trip_id: row.get(2)?,
            order: row.get::<_, i64>(3)? as u32,
            kind: row.get(4)?,
            state,
            card_type,
            title: row.get(7)?,
            description: row.get(8)?,
            detail: row.get(9)?,
            start_time: row.get(10)?,
            end_time: row.get(11)?,
            duration_min: row.get(12)?,
            priority: row.get(13)?,
            location_id: row.get(14)?,
            location_name: row.get(15)?,
            tags: JsonColumn::from_storage(row.get(16)?).to_value(),
            images: JsonColumn::from_storage(row.get(17)?).to_value(),
            cost: row.get(18)?,
            cost_currency: row.get(19)?,
            parent_event_id: row.get(20)?,
            weather: JsonColumn::from_storage(row.get(21)?).to_value(),
            created_at: row.get(22)?,
            updated_at: row.get(23)?,
            options: Vec::new(),
        })
    }

    /// Inserts a canonical event row, its location, and its option
    /// children inside the caller's transaction.
    ///
    /// The insert is plain, not an upsert: a payload reusing an existing
    /// event id fails on the primary key instead of silently overwriting
    /// the stored row.
    pub(super) fn insert_canonical_event_tx(
        conn: &Connection,
        trip_id: &str,
        day_id: &str,
        event: &CanonicalEvent,
        order: i64,
        parent_event_id: Option<&str>,
        now: i64,
    ) -> Result<()> {
        if let Some(location) = &event.location {
            Self::upsert_location_tx(conn, location)?;
        }

        // Children are always plain entries; nesting stops at one level.
        let card_type = if parent_event_id.is_some() {
            CardType::Single
        } else {
            event.card_type
        };

        conn.execute(
            INSERT_EVENT_SQL,
            params![
                &event.id,
                day_id,
                trip_id,
                order,
                &event.kind,
                event.state.as_str(),
                card_type.as_str(),
                event.title.as_deref(),
                event.description.as_deref(),
                event.detail.as_deref(),
                event.start_time.as_deref(),
                event.end_time.as_deref(),
                event.duration_min,
                event.priority,
                event.location_id.as_deref(),
                event.location_name.as_deref(),
                event.tags.to_storage(),
                event.images.to_storage(),
                event.cost,
                &event.cost_currency,
                parent_event_id,
                event.weather.to_storage(),
                now,
                now
            ],
        )
        .db_context("Failed to insert event")?;

        if parent_event_id.is_none() {
            for (child_order, child) in event.options.iter().enumerate() {
                Self::insert_canonical_event_tx(
                    conn,
                    trip_id,
                    day_id,
                    child,
                    child_order as i64,
                    Some(&event.id),
                    now,
                )?;
            }
        }

        Ok(())
    }

    /// Creates events on a day, optionally opening a gap at a clamped
    /// position; `None` appends. Returns the created events with their
    /// options attached, in insertion order.
    pub fn create_events(
        &mut self,
        trip_id: &str,
        day_id: &str,
        events: &[CanonicalEvent],
        position: Option<i64>,
    ) -> Result<Vec<Event>> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let scope = OrderScope::Events { trip_id, day_id };
        let count = ordering::count(&tx, scope)?;
        let start = ordering::clamp_position(position, count);
        if start < count {
            ordering::open_gap(&tx, scope, start, events.len() as i64)?;
        }

        let now = Timestamp::now().as_millisecond();
        for (offset, event) in events.iter().enumerate() {
            Self::insert_canonical_event_tx(
                &tx,
                trip_id,
                day_id,
                event,
                start + offset as i64,
                None,
                now,
            )?;
        }

        Self::touch_trip(&tx, trip_id)?;
        tx.commit().db_context("Failed to commit transaction")?;

        events
            .iter()
            .map(|event| {
                self.get_event_with_options(trip_id, &event.id)?
                    .ok_or_else(|| VoyageError::EventNotFound {
                        id: event.id.clone(),
                    })
            })
            .collect()
    }

    /// Applies a partial payload to an event.
    ///
    /// The payload is merged over the stored row, re-normalized, and
    /// written back; updating an event also revives it if it was soft
    /// deleted. When the payload carries an explicit `options` array and
    /// the merged event is a multi card, the stored children are replaced
    /// wholesale.
    pub fn update_event(
        &mut self,
        trip_id: &str,
        event_id: &str,
        payload: &Value,
        ids: &IdGenerator,
    ) -> Result<Event> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let current = tx
            .query_row(
                &format!("SELECT {EVENT_COLUMNS} FROM event WHERE trip_id = ?1 AND event_id = ?2"),
                params![trip_id, event_id],
                Self::build_event_from_row,
            )
            .optional()
            .db_context("Failed to get current event")?
            .ok_or_else(|| VoyageError::EventNotFound {
                id: event_id.to_string(),
            })?;

        // Merge: stored row first, payload keys win.
        let mut merged = serde_json::to_value(&current)?
            .as_object()
            .cloned()
            .unwrap_or_default();
        if let Some(incoming) = payload.as_object() {
            for (key, value) in incoming {
                merged.insert(key.clone(), value.clone());
            }
        }
        merged.insert("id".to_string(), Value::String(event_id.to_string()));

        let event = normalize_event(&Value::Object(merged), ids)
            .ok_or_else(|| VoyageError::invalid_input("event", "Invalid event payload"))?;

        if let Some(location) = &event.location {
            Self::upsert_location_tx(&tx, location)?;
        }

        let now = Timestamp::now().as_millisecond();
        tx.execute(
            UPDATE_EVENT_SQL,
            params![
                &event.kind,
                event.state.as_str(),
                event.card_type.as_str(),
                event.title.as_deref(),
                event.description.as_deref(),
                event.detail.as_deref(),
                event.start_time.as_deref(),
                event.end_time.as_deref(),
                event.duration_min,
                event.priority,
                event.location_id.as_deref(),
                event.location_name.as_deref(),
                event.tags.to_storage(),
                event.images.to_storage(),
                event.cost,
                &event.cost_currency,
                event.weather.to_storage(),
                now,
                trip_id,
                event_id
            ],
        )
        .db_context("Failed to update event")?;

        // An explicit options array replaces the children wholesale.
        let replace_options =
            event.card_type == CardType::Multi && payload.get("options").is_some_and(Value::is_array);
        if replace_options {
            tx.execute(DELETE_CHILD_EVENTS_SQL, params![event_id])
                .db_context("Failed to delete option children")?;
            for (order, child) in event.options.iter().enumerate() {
                Self::insert_canonical_event_tx(
                    &tx,
                    trip_id,
                    &current.day_id,
                    child,
                    order as i64,
                    Some(event_id),
                    now,
                )?;
            }
        }

        Self::touch_trip(&tx, trip_id)?;
        tx.commit().db_context("Failed to commit transaction")?;

        self.get_event_with_options(trip_id, event_id)?
            .ok_or_else(|| VoyageError::EventNotFound {
                id: event_id.to_string(),
            })
    }

    /// Soft-deletes an event and closes the ordering gap it leaves.
    ///
    /// Deleting an already-deleted or unknown event fails with
    /// `EventNotFound` without touching any order, so the gap can never
    /// be closed twice for one removal. Child options keep their own
    /// sibling order; only top-level removals shift the day.
    pub fn delete_event(&mut self, trip_id: &str, event_id: &str) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let position: Option<(String, i64, Option<String>)> = tx
            .query_row(SELECT_EVENT_POSITION_SQL, params![trip_id, event_id], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .optional()
            .db_context("Failed to query event position")?;

        let Some((day_id, event_order, parent_event_id)) = position else {
            return Err(VoyageError::EventNotFound {
                id: event_id.to_string(),
            });
        };

        let now = Timestamp::now().as_millisecond();
        tx.execute(SOFT_DELETE_EVENT_SQL, params![now, trip_id, event_id])
            .db_context("Failed to delete event")?;

        if parent_event_id.is_none() {
            ordering::close_gap(
                &tx,
                OrderScope::Events {
                    trip_id,
                    day_id: &day_id,
                },
                event_order,
            )?;
        }

        Self::touch_trip(&tx, trip_id)?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }

    /// Overwrites a day's top-level event order with the given sequence.
    pub fn reorder_events(&mut self, trip_id: &str, day_id: &str, order: &[String]) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        ordering::assign_sequence(&tx, OrderScope::Events { trip_id, day_id }, order)?;

        let now = Timestamp::now().as_millisecond();
        tx.execute(TOUCH_DAY_EVENTS_SQL, params![now, trip_id, day_id])
            .db_context("Failed to touch reordered events")?;
        Self::touch_trip(&tx, trip_id)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }

    /// Retrieves a live event with its option children attached.
    pub fn get_event_with_options(&self, trip_id: &str, event_id: &str) -> Result<Option<Event>> {
        let event = self
            .connection
            .query_row(
                &format!(
                    "SELECT {EVENT_COLUMNS} FROM event \
                     WHERE trip_id = ?1 AND event_id = ?2 AND is_deleted = 0"
                ),
                params![trip_id, event_id],
                Self::build_event_from_row,
            )
            .optional()
            .db_context("Failed to get event")?;

        let Some(mut event) = event else {
            return Ok(None);
        };

        if event.is_multi() {
            let mut stmt = self
                .connection
                .prepare(&format!(
                    "SELECT {EVENT_COLUMNS} FROM event \
                     WHERE parent_event_id = ?1 AND is_deleted = 0 ORDER BY event_order ASC"
                ))
                .db_context("Failed to prepare options query")?;

            event.options = stmt
                .query_map(params![event_id], Self::build_event_from_row)
                .db_context("Failed to query options")?
                .collect::<std::result::Result<Vec<_>, _>>()
                .db_context("Failed to fetch options")?;
        }

        Ok(Some(event))
    }
}
