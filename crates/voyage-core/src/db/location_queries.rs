//! Location upserts and lookups.
//!
//! Locations are shared rows referenced by events through `location_id`.
//! Saves are last-write-wins: whatever the client sent most recently
//! replaces the stored record, with no history.

use jiff::Timestamp;
use rusqlite::{params, Connection};
use serde_json::Value;

use crate::{
    error::{DatabaseResultExt, Result},
    models::{JsonColumn, Location},
};

const UPSERT_LOCATION_SQL: &str = "INSERT OR REPLACE INTO location (location_id, name, address, lat, lng, images, tags, rating, open_time, price, poi_json, created_at, updated_at) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)";

impl super::Database {
    /// Upserts a location extracted from an event payload.
    ///
    /// The whole row is replaced: a field the new payload leaves out
    /// becomes NULL rather than keeping the old value.
    pub fn upsert_location(&self, location: &Location) -> Result<()> {
        Self::upsert_location_tx(&self.connection, location)
    }

    /// Transaction-scoped variant used by event write paths.
    pub(super) fn upsert_location_tx(conn: &Connection, location: &Location) -> Result<()> {
        let now = Timestamp::now().as_millisecond();
        let meta = &location.meta;

        // Provider detail fields ride in the POI record when present.
        let meta_str = |key: &str| meta.get(key).and_then(Value::as_str).map(str::to_string);
        let open_time = meta_str("openTime").or_else(|| meta_str("open_time"));

        conn.execute(
            UPSERT_LOCATION_SQL,
            params![
                &location.id,
                location.name.as_deref(),
                location.address.as_deref(),
                location.lat,
                location.lng,
                JsonColumn::from_value(meta.get("images")).to_storage(),
                JsonColumn::from_value(meta.get("tags")).to_storage(),
                meta.get("rating").and_then(Value::as_f64),
                open_time,
                meta_str("price"),
                if meta.is_null() { None } else { Some(meta.to_string()) },
                now
            ],
        )
        .db_context("Failed to upsert location")?;

        Ok(())
    }
}
