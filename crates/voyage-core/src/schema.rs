//! Dynamic field-selection schema for client projections.
//!
//! Clients declare which fields they want per entity, either as explicit
//! field lists or by naming a built-in template (`card`, `detail`, `edit`).
//! The resolver translates client-facing field names into storage columns
//! for the SELECT, and maps fetched rows back into client-shaped
//! `serde_json` objects.
//!
//! The dictionaries below are the single point of change when a column is
//! added: every select list and every projection is derived from them.

use std::collections::HashMap;

use serde_json::{json, Map, Value};

/// A fetched storage row with dynamic columns, keyed by column name.
pub type RawRow = HashMap<String, Value>;

/// The entity kinds a projection can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Trip,
    Day,
    Event,
    Location,
}

/// Client field name → storage column, per entity.
///
/// Multiple client names may alias one column (`id`/`tripId`,
/// `time`/`startTime`). Client names with no entry here are pseudo-fields:
/// they never reach SQL and are filled in post-fetch (`duration`,
/// `location`, `options`) or defaulted.
const TRIP_FIELDS: &[(&str, &str)] = &[
    ("id", "trip_id"),
    ("tripId", "trip_id"),
    ("userId", "user_id"),
    ("slug", "slug"),
    ("title", "title"),
    ("year", "year"),
    ("description", "description"),
    ("startDate", "start_date"),
    ("endDate", "end_date"),
    ("days", "days"),
    ("cityList", "city_list"),
    ("coverImage", "cover_image"),
    ("status", "status"),
    ("visibility", "visibility"),
    ("footerText", "footer_text"),
    ("travelerCount", "traveler_count"),
    ("budgetPerPersonMin", "budget_per_person_min"),
    ("budgetPerPersonMax", "budget_per_person_max"),
    ("budgetUnit", "budget_unit"),
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
];

const DAY_FIELDS: &[(&str, &str)] = &[
    ("id", "day_id"),
    ("dayId", "day_id"),
    ("tripId", "trip_id"),
    ("dayOrder", "day_order"),
    ("date", "date"),
    ("shortDate", "short_date"),
    ("location", "location"),
    ("title", "title"),
    ("description", "description"),
    ("coverImage", "cover_image"),
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
];

const EVENT_FIELDS: &[(&str, &str)] = &[
    ("id", "event_id"),
    ("eventId", "event_id"),
    ("uid", "event_id"),
    ("dayId", "day_id"),
    ("tripId", "trip_id"),
    ("eventOrder", "event_order"),
    ("type", "type"),
    ("state", "state"),
    ("cardType", "card_type"),
    ("title", "title"),
    ("description", "description"),
    ("detail", "detail"),
    ("startTime", "start_time"),
    ("endTime", "end_time"),
    ("time", "start_time"),
    ("durationMin", "duration_min"),
    ("duration", "duration_min"),
    ("priority", "priority"),
    ("locationId", "location_id"),
    ("locationName", "location_name"),
    ("tags", "tags"),
    ("images", "images"),
    ("cost", "cost"),
    ("costCurrency", "cost_currency"),
    ("parentEventId", "parent_event_id"),
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
];

const LOCATION_FIELDS: &[(&str, &str)] = &[
    ("id", "location_id"),
    ("locationId", "location_id"),
    ("name", "name"),
    ("address", "address"),
    ("lat", "lat"),
    ("lng", "lng"),
    ("images", "images"),
    ("tags", "tags"),
    ("rating", "rating"),
    ("openTime", "open_time"),
    ("price", "price"),
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
];

/// Client fields whose stored text is JSON and must be parsed on the way
/// out (parse failure degrades to `null`).
const JSON_TEXT_FIELDS: &[&str] = &["tags", "images", "cityList"];

impl EntityKind {
    /// The storage table backing this entity.
    pub fn table(self) -> &'static str {
        match self {
            EntityKind::Trip => "trip",
            EntityKind::Day => "day",
            EntityKind::Event => "event",
            EntityKind::Location => "location",
        }
    }

    /// The client-field → column dictionary for this entity.
    pub fn field_map(self) -> &'static [(&'static str, &'static str)] {
        match self {
            EntityKind::Trip => TRIP_FIELDS,
            EntityKind::Day => DAY_FIELDS,
            EntityKind::Event => EVENT_FIELDS,
            EntityKind::Location => LOCATION_FIELDS,
        }
    }

    /// Resolves a client field name to its storage column.
    pub fn column_for(self, client_field: &str) -> Option<&'static str> {
        self.field_map()
            .iter()
            .find(|(name, _)| *name == client_field)
            .map(|(_, col)| *col)
    }

    /// Default value for a client field that is absent from the fetched row.
    fn default_value(self, client_field: &str) -> Value {
        match (self, client_field) {
            (EntityKind::Trip, "status") => json!("draft"),
            (EntityKind::Trip, "visibility") => json!("private"),
            (EntityKind::Trip, "days") => json!(0),
            (EntityKind::Trip, "travelerCount") => json!(1),
            (EntityKind::Trip, "cityList") => json!([]),
            (EntityKind::Day, "dayOrder") => json!(0),
            (EntityKind::Event, "eventOrder") => json!(0),
            (EntityKind::Event, "type") => json!("activity"),
            (EntityKind::Event, "state") => json!("active"),
            (EntityKind::Event, "cardType") => json!("single"),
            (EntityKind::Event, "costCurrency") => json!("CNY"),
            (EntityKind::Event, "priority") => json!(0),
            _ => Value::Null,
        }
    }
}

/// Columns never returned to non-owners, regardless of what the client
/// requested. `user_id` stays visible on trips only (the client needs it
/// for its own ownership check).
fn is_sensitive_column(kind: EntityKind, column: &str) -> bool {
    if column.contains("password") || column.contains("secret") || column.contains("token") {
        return true;
    }
    column == "user_id" && kind != EntityKind::Trip
}

/// Per-entity field selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldSelection {
    /// The client did not mention this entity at all. Projects like
    /// [`FieldSelection::All`], but does not trigger optional side
    /// fetches (location resolution).
    #[default]
    Unspecified,

    /// All known fields (the client sent `null`).
    All,

    /// An explicit client field list.
    Fields(Vec<String>),
}

impl FieldSelection {
    /// Builds a selection from one entity's slot in a schema JSON object.
    fn from_json(value: Option<&Value>) -> Self {
        match value {
            None => FieldSelection::Unspecified,
            Some(Value::Null) => FieldSelection::All,
            Some(Value::Array(items)) => FieldSelection::Fields(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
            ),
            Some(_) => FieldSelection::Unspecified,
        }
    }

    /// True when the client explicitly asked for this entity's data
    /// (either all fields or a list). Gates optional side fetches.
    pub fn is_requested(&self) -> bool {
        !matches!(self, FieldSelection::Unspecified)
    }

    /// True when the given client field should be produced.
    /// `Unspecified` and `All` include everything.
    pub fn wants(&self, client_field: &str) -> bool {
        match self {
            FieldSelection::Unspecified | FieldSelection::All => true,
            FieldSelection::Fields(fields) => fields.iter().any(|f| f == client_field),
        }
    }

    /// Resolves the selection into storage columns for a SELECT.
    ///
    /// Unknown client names are dropped; duplicate columns (aliases) are
    /// deduplicated; an explicit list that resolves to nothing falls back
    /// to all columns so a row is never empty. Sensitive columns are
    /// stripped for non-owners.
    pub fn select_columns(&self, kind: EntityKind, is_owner: bool) -> Vec<&'static str> {
        let mut columns: Vec<&'static str> = Vec::new();
        let mut push = |col: &'static str| {
            if !columns.contains(&col) && (is_owner || !is_sensitive_column(kind, col)) {
                columns.push(col);
            }
        };

        match self {
            FieldSelection::Unspecified | FieldSelection::All => {
                for (_, col) in kind.field_map() {
                    push(col);
                }
            }
            FieldSelection::Fields(fields) => {
                for field in fields {
                    if let Some(col) = kind.column_for(field) {
                        push(col);
                    }
                }
                if columns.is_empty() {
                    return FieldSelection::All.select_columns(kind, is_owner);
                }
            }
        }

        columns
    }

    /// The client field names this selection will produce, in order.
    fn client_fields(&self, kind: EntityKind) -> Vec<String> {
        match self {
            FieldSelection::Unspecified | FieldSelection::All => kind
                .field_map()
                .iter()
                .map(|(name, _)| (*name).to_string())
                .collect(),
            FieldSelection::Fields(fields) => fields.clone(),
        }
    }
}

/// Maps a fetched row back to an object keyed by client field names.
///
/// Every requested field appears in the output: fields backed by a column
/// take the row's value (JSON-text columns parsed, failure → `null`),
/// everything else gets the entity default. The derived `duration`
/// pseudo-field is skipped here — the assembler computes it post-fetch.
pub fn project_row(kind: EntityKind, row: &RawRow, selection: &FieldSelection) -> Map<String, Value> {
    let mut out = Map::new();

    for field in selection.client_fields(kind) {
        if kind == EntityKind::Event && field == "duration" {
            continue;
        }

        let value = match kind.column_for(&field).and_then(|col| row.get(col)) {
            Some(v) if !v.is_null() => {
                if JSON_TEXT_FIELDS.contains(&field.as_str()) {
                    match v.as_str() {
                        Some(text) => serde_json::from_str(text).unwrap_or(Value::Null),
                        None => v.clone(),
                    }
                } else {
                    v.clone()
                }
            }
            Some(_) | None => kind.default_value(&field),
        };

        out.insert(field, value);
    }

    out
}

/// A complete projection schema covering all four entities.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectionSchema {
    pub trip: FieldSelection,
    pub day: FieldSelection,
    pub event: FieldSelection,
    pub location: FieldSelection,
}

impl ProjectionSchema {
    /// Parses a client-supplied schema JSON string.
    ///
    /// Malformed JSON or a non-object payload is swallowed and treated as
    /// "no schema provided" — callers fall through to a template.
    pub fn parse(raw: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(raw).ok()?;
        let obj = value.as_object()?;
        Some(Self {
            trip: FieldSelection::from_json(obj.get("trip")),
            day: FieldSelection::from_json(obj.get("day")),
            event: FieldSelection::from_json(obj.get("event")),
            location: FieldSelection::from_json(obj.get("location")),
        })
    }

    /// Looks up a built-in template by name. Unknown names yield `None`.
    pub fn template(name: &str) -> Option<Self> {
        match name {
            "card" => Some(Self {
                trip: fields(&[
                    "id", "title", "year", "description", "startDate", "endDate", "days",
                    "cityList", "coverImage", "status", "visibility", "footerText",
                    "travelerCount", "budgetPerPersonMin", "budgetPerPersonMax", "budgetUnit",
                ]),
                day: fields(&["id", "date", "shortDate", "location"]),
                event: fields(&[
                    "id", "type", "title", "description", "detail", "state", "startTime",
                    "endTime", "time", "durationMin", "duration", "locationId", "locationName",
                    "location", "tags", "images", "cost", "costCurrency", "cardType", "options",
                    "parentEventId",
                ]),
                location: fields(&[
                    "id", "name", "lat", "lng", "address", "images", "tags", "rating",
                    "openTime", "price",
                ]),
            }),
            "detail" => Some(Self {
                trip: fields(&[
                    "id", "userId", "title", "description", "coverImage", "cityList",
                    "visibility", "status", "startDate", "endDate", "days", "travelerCount",
                    "budgetPerPersonMin", "budgetPerPersonMax", "budgetUnit",
                ]),
                day: fields(&["id", "date", "shortDate", "location", "title", "description"]),
                event: fields(&[
                    "id", "type", "title", "description", "detail", "state", "startTime",
                    "endTime", "durationMin", "locationId", "locationName", "location", "tags",
                    "images", "cost", "costCurrency", "cardType",
                ]),
                location: fields(&[
                    "id", "name", "address", "lat", "lng", "images", "tags", "rating",
                    "openTime", "price",
                ]),
            }),
            "edit" => Some(Self {
                trip: FieldSelection::All,
                day: FieldSelection::All,
                event: FieldSelection::All,
                location: FieldSelection::All,
            }),
            _ => None,
        }
    }

    /// Resolves the effective schema from an optional raw JSON schema and
    /// an optional template name, defaulting to the `card` template.
    pub fn resolve(raw_schema: Option<&str>, template: Option<&str>) -> Self {
        raw_schema
            .and_then(Self::parse)
            .or_else(|| template.and_then(Self::template))
            .or_else(|| Self::template("card"))
            .unwrap_or_default()
    }
}

fn fields(names: &[&str]) -> FieldSelection {
    FieldSelection::Fields(names.iter().map(|s| (*s).to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_row() -> RawRow {
        let mut row = RawRow::new();
        row.insert("event_id".into(), json!("E1"));
        row.insert("title".into(), json!("Lunch"));
        row.insert("start_time".into(), json!("12:00"));
        row.insert("duration_min".into(), json!(90));
        row.insert("tags".into(), json!("[\"food\",\"local\"]"));
        row.insert("card_type".into(), json!("single"));
        row
    }

    #[test]
    fn unknown_client_names_are_dropped_from_select() {
        let sel = FieldSelection::Fields(vec!["id".into(), "bogus".into(), "title".into()]);
        let cols = sel.select_columns(EntityKind::Event, true);
        assert_eq!(cols, vec!["event_id", "title"]);
    }

    #[test]
    fn empty_resolution_falls_back_to_all_columns() {
        let sel = FieldSelection::Fields(vec!["bogus".into(), "alsoBogus".into()]);
        let cols = sel.select_columns(EntityKind::Day, true);
        let all = FieldSelection::All.select_columns(EntityKind::Day, true);
        assert_eq!(cols, all);
        assert!(cols.contains(&"day_id"));
    }

    #[test]
    fn aliases_deduplicate_to_one_column() {
        let sel = FieldSelection::Fields(vec!["id".into(), "eventId".into(), "uid".into()]);
        let cols = sel.select_columns(EntityKind::Event, true);
        assert_eq!(cols, vec!["event_id"]);
    }

    #[test]
    fn non_owner_loses_sensitive_columns_except_trip_owner_id() {
        let all_trip = FieldSelection::All.select_columns(EntityKind::Trip, false);
        assert!(all_trip.contains(&"user_id"));

        // A hypothetical user_id on any other entity would be stripped.
        assert!(is_sensitive_column(EntityKind::Event, "user_id"));
        assert!(is_sensitive_column(EntityKind::Trip, "password_hash"));
        assert!(!is_sensitive_column(EntityKind::Trip, "user_id"));
    }

    #[test]
    fn projection_returns_exactly_the_requested_fields() {
        let sel = FieldSelection::Fields(vec![
            "id".into(),
            "title".into(),
            "time".into(),
            "state".into(),
        ]);
        let out = project_row(EntityKind::Event, &event_row(), &sel);
        assert_eq!(out.len(), 4);
        assert_eq!(out["id"], json!("E1"));
        assert_eq!(out["title"], json!("Lunch"));
        // `time` is an alias of the start_time column.
        assert_eq!(out["time"], json!("12:00"));
        // state is absent from the row, so the entity default applies.
        assert_eq!(out["state"], json!("active"));
    }

    #[test]
    fn duration_pseudo_field_is_left_for_the_assembler() {
        let sel = FieldSelection::Fields(vec!["id".into(), "duration".into()]);
        let out = project_row(EntityKind::Event, &event_row(), &sel);
        assert!(!out.contains_key("duration"));
    }

    #[test]
    fn json_text_columns_are_parsed_with_null_on_failure() {
        let sel = FieldSelection::Fields(vec!["tags".into()]);
        let out = project_row(EntityKind::Event, &event_row(), &sel);
        assert_eq!(out["tags"], json!(["food", "local"]));

        let mut bad = event_row();
        bad.insert("tags".into(), json!("{broken"));
        let out = project_row(EntityKind::Event, &bad, &sel);
        assert_eq!(out["tags"], Value::Null);
    }

    #[test]
    fn malformed_schema_json_degrades_to_none() {
        assert!(ProjectionSchema::parse("{not json").is_none());
        assert!(ProjectionSchema::parse("[1,2,3]").is_none());
    }

    #[test]
    fn schema_parse_distinguishes_null_list_and_missing() {
        let schema = ProjectionSchema::parse(r#"{"event": ["id"], "location": null}"#).unwrap();
        assert_eq!(schema.event, FieldSelection::Fields(vec!["id".to_string()]));
        assert_eq!(schema.location, FieldSelection::All);
        assert_eq!(schema.day, FieldSelection::Unspecified);
        assert!(!schema.day.is_requested());
        assert!(schema.location.is_requested());
    }

    #[test]
    fn unknown_template_falls_back_to_card() {
        assert!(ProjectionSchema::template("nonsense").is_none());
        let resolved = ProjectionSchema::resolve(None, Some("nonsense"));
        assert_eq!(resolved, ProjectionSchema::template("card").unwrap());
    }

    #[test]
    fn edit_template_selects_everything() {
        let schema = ProjectionSchema::template("edit").unwrap();
        assert_eq!(schema.event, FieldSelection::All);
        assert!(schema.event.wants("parentEventId"));
    }
}
