//! Schedule assembly: the schema-driven read side.
//!
//! One call produces the complete client view of a trip's itinerary:
//! projected days, each carrying its projected top-level events with
//! multi-card options nested, referenced locations fetched in one batch
//! and attached, and derived `time`/`duration` fields computed post-fetch.
//!
//! The whole view is built from three queries regardless of trip size:
//! one for days, one `IN (...)` query for all events (parents and
//! children together), and one batch fetch for locations.

use jiff::civil::Date;
use rusqlite::params_from_iter;
use serde_json::{json, Map, Value};

use crate::{
    db::rows::{placeholders, row_to_map, select_list},
    error::{DatabaseResultExt, Result},
    models::DurationParts,
    normalize::generate_short_date,
    schema::{project_row, EntityKind, FieldSelection, ProjectionSchema, RawRow},
};

/// Structural event columns every assembly query needs, independent of
/// what the client requested: grouping, nesting, and location collection
/// all depend on them.
const FORCED_EVENT_COLUMNS: &[&str] = &[
    "event_id",
    "day_id",
    "card_type",
    "parent_event_id",
    "location_id",
];

/// A schedule assembly request.
#[derive(Debug, Clone)]
pub struct ScheduleQuery<'a> {
    pub trip_id: &'a str,
    /// Optional day filter: a day id or a `YYYY-MM-DD` date.
    pub day_ref: Option<&'a str>,
    /// Optional single-event filter (the event and its children).
    pub event_id: Option<&'a str>,
    pub schema: &'a ProjectionSchema,
    /// Whether to include the trip object and flat days list.
    pub include_trip: bool,
    /// Owner access: non-owners lose sensitive columns.
    pub is_owner: bool,
}

/// The assembled schedule view.
#[derive(Debug, Clone, Default)]
pub struct ScheduleData {
    pub trip_id: String,
    /// Projected day objects, each with an `events` array.
    pub days: Vec<Value>,
    /// Projected location objects referenced by the events.
    pub locations: Vec<Value>,
    /// Projected trip object, when requested.
    pub trip: Option<Value>,
    /// Flat day list for navigation, when requested.
    pub days_list: Option<Vec<Value>>,
}

impl super::Database {
    /// Assembles the schedule view for a trip.
    pub fn assemble_schedule(&self, query: &ScheduleQuery<'_>) -> Result<ScheduleData> {
        let schema = query.schema;

        // Dates resolve to a stored day id; an unknown date falls through
        // as-is for virtual-day synthesis against legacy data.
        let day_filter = match query.day_ref {
            Some(day_ref) if day_ref.contains('-') => Some(
                self.resolve_day_id(query.trip_id, day_ref)?
                    .unwrap_or_else(|| day_ref.to_string()),
            ),
            Some(day_ref) => Some(day_ref.to_string()),
            None => None,
        };

        let day_rows = self.fetch_day_rows(query, day_filter.as_deref())?;
        let (events_by_day, children_by_parent, location_ids) =
            self.fetch_event_rows(query, &day_rows)?;

        let locations = self.fetch_locations(query, &location_ids)?;
        let location_map = build_location_map(&locations);

        let attach_locations = match &schema.event {
            FieldSelection::All => true,
            FieldSelection::Fields(_) => schema.event.wants("location"),
            FieldSelection::Unspecified => false,
        };
        let attach_options = schema.event.wants("options");
        let needs_time = derived_field_requested(&schema.event, "time");
        let needs_duration = derived_field_requested(&schema.event, "duration");

        let mut days = Vec::with_capacity(day_rows.len());
        for day_row in &day_rows {
            let day_id = raw_id(day_row, "day_id");
            let mut day = project_row(EntityKind::Day, day_row, &schema.day);

            let events = events_by_day
                .get(&day_id)
                .map(Vec::as_slice)
                .unwrap_or_default();

            let mut projected_events = Vec::with_capacity(events.len());
            for event_row in events {
                let mut event = project_row(EntityKind::Event, event_row, &schema.event);

                let is_multi = event_row.get("card_type").and_then(Value::as_str) == Some("multi");
                if is_multi && attach_options {
                    let event_id = raw_id(event_row, "event_id");
                    let children = children_by_parent
                        .get(&event_id)
                        .map(Vec::as_slice)
                        .unwrap_or_default();

                    let options: Vec<Value> = children
                        .iter()
                        .map(|child_row| {
                            let mut child = project_row(EntityKind::Event, child_row, &schema.event);
                            // Children always expose their location linkage,
                            // whatever the field list says.
                            for (field, column) in
                                [("locationId", "location_id"), ("locationName", "location_name")]
                            {
                                if let Some(v) = child_row.get(column).filter(|v| !v.is_null()) {
                                    child.insert(field.to_string(), v.clone());
                                }
                            }
                            finish_event(&mut child, &location_map, attach_locations, needs_time, needs_duration);
                            Value::Object(child)
                        })
                        .collect();
                    event.insert("options".to_string(), Value::Array(options));
                }

                finish_event(&mut event, &location_map, attach_locations, needs_time, needs_duration);
                projected_events.push(Value::Object(event));
            }

            day.insert("events".to_string(), Value::Array(projected_events));
            days.push(Value::Object(day));
        }

        let mut data = ScheduleData {
            trip_id: query.trip_id.to_string(),
            days,
            locations,
            trip: None,
            days_list: None,
        };

        if query.include_trip {
            if let Some(trip) = self.get_trip(query.trip_id)? {
                data.days_list = Some(self.build_days_list(query.trip_id, &trip)?);
                data.trip = Some(serde_json::to_value(&trip)?);
            }
        }

        Ok(data)
    }

    fn fetch_day_rows(
        &self,
        query: &ScheduleQuery<'_>,
        day_filter: Option<&str>,
    ) -> Result<Vec<RawRow>> {
        let schema = query.schema;
        let mut columns = schema.day.select_columns(EntityKind::Day, query.is_owner);
        if !columns.contains(&"day_id") {
            columns.push("day_id");
        }

        let sql = format!(
            "SELECT {} FROM day WHERE trip_id = ?1{} ORDER BY day_order ASC",
            select_list(&columns),
            if day_filter.is_some() { " AND day_id = ?2" } else { "" },
        );

        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare day projection query")?;

        let mut params = vec![query.trip_id];
        if let Some(day_id) = day_filter {
            params.push(day_id);
        }
        let mut rows = stmt
            .query_map(params_from_iter(params), |row| row_to_map(row))
            .db_context("Failed to query day projections")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch day projections")?;

        // A day filter that matched nothing still yields one synthesized
        // day, so a view over unsaved days renders instead of erroring.
        if rows.is_empty() {
            if let Some(reference) = day_filter {
                let looks_like_date = reference.contains('-');
                let mut virtual_day = RawRow::new();
                virtual_day.insert("day_id".into(), json!(reference));
                virtual_day.insert(
                    "date".into(),
                    json!(if looks_like_date { reference } else { "" }),
                );
                virtual_day.insert(
                    "short_date".into(),
                    json!(generate_short_date(reference).unwrap_or_default()),
                );
                virtual_day.insert("location".into(), json!(""));
                rows.push(virtual_day);
            }
        }

        Ok(rows)
    }

    /// Fetches all events of the given days in one query and groups them
    /// by day (top level) and by parent (children), collecting referenced
    /// location ids along the way.
    #[allow(clippy::type_complexity)]
    fn fetch_event_rows(
        &self,
        query: &ScheduleQuery<'_>,
        day_rows: &[RawRow],
    ) -> Result<(
        std::collections::HashMap<String, Vec<RawRow>>,
        std::collections::HashMap<String, Vec<RawRow>>,
        Vec<String>,
    )> {
        use std::collections::HashMap;

        let mut events_by_day: HashMap<String, Vec<RawRow>> = HashMap::new();
        let mut children_by_parent: HashMap<String, Vec<RawRow>> = HashMap::new();
        let mut location_ids: Vec<String> = Vec::new();

        let day_ids: Vec<String> = day_rows
            .iter()
            .map(|row| raw_id(row, "day_id"))
            .filter(|id| !id.is_empty())
            .collect();
        if day_ids.is_empty() {
            return Ok((events_by_day, children_by_parent, location_ids));
        }

        let schema = query.schema;
        let mut columns = schema.event.select_columns(EntityKind::Event, query.is_owner);
        for forced in FORCED_EVENT_COLUMNS {
            if !columns.contains(forced) {
                columns.push(forced);
            }
        }

        let event_filter = match query.event_id {
            Some(_) => format!(
                " AND (event_id = ?{n} OR parent_event_id = ?{n})",
                n = day_ids.len() + 2
            ),
            None => String::new(),
        };
        let sql = format!(
            "SELECT {} FROM event WHERE trip_id = ?1 AND day_id IN ({}) \
             AND is_deleted = 0{} ORDER BY event_order ASC",
            select_list(&columns),
            // day id placeholders start after the trip id
            (0..day_ids.len())
                .map(|i| format!("?{}", i + 2))
                .collect::<Vec<_>>()
                .join(", "),
            event_filter,
        );

        let mut params: Vec<&str> = Vec::with_capacity(day_ids.len() + 2);
        params.push(query.trip_id);
        params.extend(day_ids.iter().map(String::as_str));
        if let Some(event_id) = query.event_id {
            params.push(event_id);
        }

        let collect_locations = match &schema.event {
            FieldSelection::All => true,
            FieldSelection::Fields(_) => {
                schema.event.wants("locationId") || schema.event.wants("location")
            }
            FieldSelection::Unspecified => false,
        };

        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare event projection query")?;
        let rows = stmt
            .query_map(params_from_iter(params), |row| row_to_map(row))
            .db_context("Failed to query event projections")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch event projections")?;

        for row in rows {
            if collect_locations {
                if let Some(location_id) = row.get("location_id").and_then(Value::as_str) {
                    if !location_id.is_empty() && !location_ids.contains(&location_id.to_string()) {
                        location_ids.push(location_id.to_string());
                    }
                }
            }

            match row.get("parent_event_id").and_then(Value::as_str) {
                Some(parent) if !parent.is_empty() => children_by_parent
                    .entry(parent.to_string())
                    .or_default()
                    .push(row),
                _ => events_by_day
                    .entry(raw_id(&row, "day_id"))
                    .or_default()
                    .push(row),
            }
        }

        Ok((events_by_day, children_by_parent, location_ids))
    }

    /// Batch-fetches the referenced locations, degrading requested columns
    /// the stored table lacks to `NULL AS col` so older database files
    /// keep working.
    fn fetch_locations(
        &self,
        query: &ScheduleQuery<'_>,
        location_ids: &[String],
    ) -> Result<Vec<Value>> {
        let selection = &query.schema.location;
        if !selection.is_requested() || location_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut columns = selection.select_columns(EntityKind::Location, query.is_owner);
        if !columns.contains(&"location_id") {
            columns.push("location_id");
        }

        let available = self.table_columns("location")?;
        let select_parts: Vec<String> = columns
            .iter()
            .map(|col| {
                if available.iter().any(|a| a == col) {
                    format!("\"{col}\"")
                } else {
                    format!("NULL AS \"{col}\"")
                }
            })
            .collect();

        let sql = format!(
            "SELECT {} FROM location WHERE location_id IN ({})",
            select_parts.join(", "),
            placeholders(location_ids.len()),
        );

        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare location projection query")?;
        let rows = stmt
            .query_map(
                params_from_iter(location_ids.iter().map(String::as_str)),
                |row| row_to_map(row),
            )
            .db_context("Failed to query location projections")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch location projections")?;

        Ok(rows
            .iter()
            .map(|row| {
                let mut projected = project_row(EntityKind::Location, row, selection);
                // The raw id always rides along for map lookups.
                if !projected.contains_key("id") {
                    projected.insert("id".to_string(), json!(raw_id(row, "location_id")));
                }
                Value::Object(projected)
            })
            .collect())
    }

    /// The flat navigation day list: stored days when present, otherwise
    /// synthesized from the trip's date range.
    fn build_days_list(&self, trip_id: &str, trip: &crate::models::Trip) -> Result<Vec<Value>> {
        let days = self.list_days(trip_id)?;
        if !days.is_empty() {
            return Ok(days
                .iter()
                .map(|day| {
                    json!({
                        "id": day.id,
                        "date": day.date.clone().unwrap_or_default(),
                        "shortDate": day.short_date.clone().unwrap_or_default(),
                        "location": day.location.clone().unwrap_or_default(),
                        "order": day.order,
                    })
                })
                .collect());
        }

        let (Some(start), Some(end)) = (trip.start_date.as_deref(), trip.end_date.as_deref())
        else {
            return Ok(Vec::new());
        };
        let (Ok(start), Ok(end)) = (start.parse::<Date>(), end.parse::<Date>()) else {
            return Ok(Vec::new());
        };

        let mut list = Vec::new();
        let mut date = start;
        let mut order = 0u32;
        while date <= end {
            let date_str = date.to_string();
            list.push(json!({
                "id": date_str,
                "date": date_str,
                "shortDate": generate_short_date(&date_str).unwrap_or_default(),
                "location": "",
                "order": order,
            }));
            let Ok(next) = date.tomorrow() else { break };
            date = next;
            order += 1;
        }
        Ok(list)
    }
}

fn derived_field_requested(selection: &FieldSelection, field: &str) -> bool {
    match selection {
        FieldSelection::All => true,
        FieldSelection::Fields(_) => selection.wants(field),
        FieldSelection::Unspecified => false,
    }
}

/// Reads an id column as a string, tolerating numeric storage.
fn raw_id(row: &RawRow, column: &str) -> String {
    match row.get(column) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn build_location_map(locations: &[Value]) -> Map<String, Value> {
    let mut map = Map::new();
    for location in locations {
        let id = location
            .get("id")
            .or_else(|| location.get("locationId"))
            .map(value_as_key)
            .unwrap_or_default();
        if !id.is_empty() {
            map.insert(id, location.clone());
        }
    }
    map
}

/// Location ids may surface as TEXT or INTEGER depending on how the row
/// was written; both forms key the same entry.
fn value_as_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// Applies the post-fetch derivations to one projected event: location
/// attachment and the `time`/`duration` pseudo-fields.
fn finish_event(
    event: &mut Map<String, Value>,
    location_map: &Map<String, Value>,
    attach_location: bool,
    needs_time: bool,
    needs_duration: bool,
) {
    if attach_location {
        if let Some(location_id) = event.get("locationId").filter(|v| !v.is_null()) {
            let key = value_as_key(location_id);
            let location = location_map.get(&key).cloned().unwrap_or(Value::Null);
            event.insert("location".to_string(), location);
        }
    }

    if needs_time {
        if let Some(start) = event
            .get("startTime")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
        {
            event.insert("time".to_string(), json!(start));
        }
    }

    if needs_duration {
        if let Some(minutes) = event.get("durationMin").and_then(Value::as_i64) {
            if let Some(parts) = DurationParts::from_minutes(minutes) {
                event.insert(
                    "duration".to_string(),
                    serde_json::to_value(parts).unwrap_or(Value::Null),
                );
            }
        }
    }
}
