//! Canonicalization of client-supplied day and event payloads.
//!
//! Client payloads arrive as loose JSON accumulated across several app
//! generations: legacy key aliases (`time` for `startTime`, `uid` for the
//! event id), durations as human-readable text, costs as strings, and
//! locations embedded either flat or under a `location` object. The
//! functions here fold all of that into one canonical write model before
//! anything touches storage.

use jiff::civil::Date;
use serde_json::Value;

use crate::idgen::IdGenerator;
use crate::models::{CardType, EventState, JsonColumn, Location};

/// An event payload reduced to canonical storage shape.
///
/// `order` and `parent_event_id` are assigned by the storage layer at
/// insert time and are deliberately absent here.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalEvent {
    pub id: String,
    pub kind: String,
    pub state: EventState,
    pub card_type: CardType,
    pub title: Option<String>,
    pub description: Option<String>,
    pub detail: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub duration_min: Option<i64>,
    pub priority: i64,
    pub location_id: Option<String>,
    pub location_name: Option<String>,
    pub tags: JsonColumn,
    pub images: JsonColumn,
    pub cost: Option<f64>,
    pub cost_currency: String,
    pub weather: JsonColumn,

    /// Location record extracted from the payload, to be upserted
    /// alongside the event.
    pub location: Option<Location>,

    /// Child events of a multi card, already canonicalized.
    pub options: Vec<CanonicalEvent>,
}

/// A day payload reduced to canonical storage shape.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalDay {
    pub id: String,
    pub date: Option<String>,
    pub short_date: Option<String>,
    pub location: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,

    /// Events embedded in the day payload.
    pub events: Vec<CanonicalEvent>,
}

/// Canonicalizes one client event payload.
///
/// Returns `None` when the payload is not a JSON object. An id present in
/// the payload (under `id`, `eventId`, or the legacy `uid`) is kept;
/// otherwise a fresh one is allocated.
pub fn normalize_event(payload: &Value, ids: &IdGenerator) -> Option<CanonicalEvent> {
    let obj = payload.as_object()?;

    let id = ["id", "eventId", "uid"]
        .iter()
        .find_map(|key| non_empty_string(obj.get(*key)))
        .unwrap_or_else(|| ids.next_event_id());

    let options: Vec<CanonicalEvent> = obj
        .get("options")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| normalize_event(item, ids))
                .collect()
        })
        .unwrap_or_default();

    // A payload carrying options is a multi card regardless of what it
    // claims; otherwise fall back to the declared type, then to single.
    let card_type = if options.is_empty() {
        non_empty_string(obj.get("cardType"))
            .or_else(|| non_empty_string(obj.get("card_type")))
            .and_then(|s| s.parse().ok())
            .unwrap_or(CardType::Single)
    } else {
        CardType::Multi
    };

    let duration_min = obj
        .get("durationMin")
        .or_else(|| obj.get("duration_min"))
        .and_then(to_int)
        .or_else(|| {
            obj.get("duration").and_then(|v| match v {
                Value::String(text) => parse_duration_text(text),
                other => to_int(other),
            })
        })
        .filter(|minutes| *minutes > 0);

    let (location, location_id, location_name) = extract_location(obj);

    Some(CanonicalEvent {
        id,
        kind: non_empty_string(obj.get("type")).unwrap_or_else(|| "activity".to_string()),
        state: non_empty_string(obj.get("state"))
            .and_then(|s| s.parse().ok())
            .unwrap_or(EventState::Active),
        card_type,
        title: non_empty_string(obj.get("title")),
        description: non_empty_string(obj.get("description")),
        detail: non_empty_string(obj.get("detail")),
        start_time: non_empty_string(obj.get("startTime")).or_else(|| non_empty_string(obj.get("time"))),
        end_time: non_empty_string(obj.get("endTime")).or_else(|| non_empty_string(obj.get("end_time"))),
        duration_min,
        priority: obj.get("priority").and_then(to_int).unwrap_or(0),
        location_id,
        location_name,
        tags: JsonColumn::from_value(obj.get("tags")),
        images: match JsonColumn::from_value(obj.get("images")) {
            JsonColumn::Absent => JsonColumn::Parsed(Value::Array(Vec::new())),
            present => present,
        },
        cost: to_cost(obj.get("cost")),
        cost_currency: non_empty_string(obj.get("costCurrency"))
            .or_else(|| non_empty_string(obj.get("cost_currency")))
            .unwrap_or_else(|| "CNY".to_string()),
        weather: JsonColumn::from_value(obj.get("weather")),
        location,
        options,
    })
}

/// Canonicalizes one client day payload, including any embedded events.
pub fn normalize_day(payload: &Value, ids: &IdGenerator) -> Option<CanonicalDay> {
    let obj = payload.as_object()?;

    let id = ["id", "dayId"]
        .iter()
        .find_map(|key| non_empty_string(obj.get(*key)))
        .unwrap_or_else(|| ids.next_day_id());

    let date = non_empty_string(obj.get("date"));
    let short_date = non_empty_string(obj.get("shortDate"))
        .or_else(|| date.as_deref().and_then(generate_short_date));

    let events = obj
        .get("events")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| normalize_event(item, ids))
                .collect()
        })
        .unwrap_or_default();

    Some(CanonicalDay {
        id,
        date,
        short_date,
        location: non_empty_string(obj.get("location")),
        title: non_empty_string(obj.get("title")),
        description: non_empty_string(obj.get("description")),
        cover_image: non_empty_string(obj.get("coverImage")),
        events,
    })
}

/// Parses human-readable duration text into minutes.
///
/// Accepts `"2小时30分钟"`, `"2小时"`, and `"45分钟"`. A bare numeral
/// carries no unit and yields `None`; numeric durations arrive through
/// `durationMin` instead. Returns `None` for anything else or a
/// non-positive result.
pub fn parse_duration_text(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut total: i64 = 0;
    let mut number: Option<i64> = None;
    let mut matched_unit = false;

    for ch in trimmed.chars() {
        if let Some(digit) = ch.to_digit(10) {
            number = Some(number.unwrap_or(0) * 10 + i64::from(digit));
        } else if ch == '小' || ch == '时' {
            // "小时" spans two chars; the number is consumed on the first.
            if ch == '小' {
                total += number.take()? * 60;
                matched_unit = true;
            }
        } else if ch == '分' || ch == '钟' {
            if ch == '分' {
                total += number.take()?;
                matched_unit = true;
            }
        } else if !ch.is_whitespace() {
            return None;
        }
    }

    (matched_unit && number.is_none() && total > 0).then_some(total)
}

/// Derives the display form `"M月D日"` from a `YYYY-MM-DD` date string.
pub fn generate_short_date(date: &str) -> Option<String> {
    let parsed: Date = date.trim().parse().ok()?;
    Some(format!("{}月{}日", parsed.month(), parsed.day()))
}

/// Coerces a loose JSON value to an integer (floats truncate, numeric
/// strings parse).
pub fn to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|f| f.trunc() as i64))
        }
        _ => None,
    }
}

fn to_cost(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    let v = value?;
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Pulls location data out of an event payload.
///
/// The location may be embedded as an object under `location` (optionally
/// carrying a provider `poi` record) or flattened into `locationId` /
/// `locationName` on the event itself.
fn extract_location(
    obj: &serde_json::Map<String, Value>,
) -> (Option<Location>, Option<String>, Option<String>) {
    if let Some(embedded) = obj.get("location").filter(|v| v.is_object()) {
        if let Some(location) = Location::from_payload(embedded) {
            let name = location
                .name
                .clone()
                .or_else(|| non_empty_string(obj.get("locationName")));
            let id = location.id.clone();
            return (Some(location), Some(id), name);
        }
    }

    let id = crate::models::normalize_location_id(obj.get("locationId").unwrap_or(&Value::Null));
    let name = non_empty_string(obj.get("locationName"));
    (None, id, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids() -> IdGenerator {
        IdGenerator::new()
    }

    #[test]
    fn defaults_apply_to_a_minimal_event() {
        let event = normalize_event(&json!({"title": "Lunch"}), &ids()).unwrap();
        assert_eq!(event.kind, "activity");
        assert_eq!(event.state, EventState::Active);
        assert_eq!(event.card_type, CardType::Single);
        assert_eq!(event.cost_currency, "CNY");
        assert_eq!(event.priority, 0);
        assert_eq!(event.images, JsonColumn::Parsed(json!([])));
        assert!(event.tags.is_absent());
        assert_eq!(event.id.len(), 13);
    }

    #[test]
    fn legacy_aliases_are_honored() {
        let event = normalize_event(
            &json!({"uid": "E9", "time": "09:30", "end_time": "11:00"}),
            &ids(),
        )
        .unwrap();
        assert_eq!(event.id, "E9");
        assert_eq!(event.start_time.as_deref(), Some("09:30"));
        assert_eq!(event.end_time.as_deref(), Some("11:00"));
    }

    #[test]
    fn legacy_snake_case_currency_and_card_type() {
        let event = normalize_event(
            &json!({"cost_currency": "USD", "card_type": "multi"}),
            &ids(),
        )
        .unwrap();
        assert_eq!(event.cost_currency, "USD");
        assert_eq!(event.card_type, CardType::Multi);

        // The camelCase keys win when both spellings are present.
        let event = normalize_event(
            &json!({"costCurrency": "EUR", "cost_currency": "USD"}),
            &ids(),
        )
        .unwrap();
        assert_eq!(event.cost_currency, "EUR");
    }

    #[test]
    fn duration_falls_back_through_numeric_then_text() {
        let numeric = normalize_event(&json!({"durationMin": 45}), &ids()).unwrap();
        assert_eq!(numeric.duration_min, Some(45));

        let text = normalize_event(&json!({"duration": "2小时30分钟"}), &ids()).unwrap();
        assert_eq!(text.duration_min, Some(150));

        let zero = normalize_event(&json!({"durationMin": 0}), &ids()).unwrap();
        assert_eq!(zero.duration_min, None);
    }

    #[test]
    fn duration_text_parsing_table() {
        assert_eq!(parse_duration_text("2小时30分钟"), Some(150));
        assert_eq!(parse_duration_text("2小时"), Some(120));
        assert_eq!(parse_duration_text("45分钟"), Some(45));
        // A bare numeral carries no unit and is not a duration text.
        assert_eq!(parse_duration_text("90"), None);
        assert_eq!(parse_duration_text("soon"), None);
        assert_eq!(parse_duration_text(""), None);
        assert_eq!(parse_duration_text("0分钟"), None);
    }

    #[test]
    fn cost_coercion_table() {
        let cases = [
            (json!({"cost": 120}), Some(120.0)),
            (json!({"cost": 99.5}), Some(99.5)),
            (json!({"cost": "88"}), Some(88.0)),
            (json!({"cost": " 12.5 "}), Some(12.5)),
            (json!({"cost": "free"}), None),
            (json!({"cost": null}), None),
            (json!({}), None),
        ];
        for (payload, expected) in cases {
            let event = normalize_event(&payload, &ids()).unwrap();
            assert_eq!(event.cost, expected, "payload: {payload}");
        }
    }

    #[test]
    fn options_force_multi_card_type() {
        let event = normalize_event(
            &json!({
                "cardType": "single",
                "options": [
                    {"title": "Option A"},
                    {"title": "Option B"}
                ]
            }),
            &ids(),
        )
        .unwrap();
        assert_eq!(event.card_type, CardType::Multi);
        assert_eq!(event.options.len(), 2);
        assert_eq!(event.options[0].title.as_deref(), Some("Option A"));
        assert_ne!(event.options[0].id, event.options[1].id);
    }

    #[test]
    fn embedded_location_is_extracted_with_poi_fallback() {
        let event = normalize_event(
            &json!({
                "location": {"poi": {"id": "B0FF123", "rating": 4.6}, "name": "West Lake"}
            }),
            &ids(),
        )
        .unwrap();
        assert_eq!(event.location_id.as_deref(), Some("B0FF123"));
        assert_eq!(event.location_name.as_deref(), Some("West Lake"));
        let location = event.location.unwrap();
        assert_eq!(location.id, "B0FF123");
        assert_eq!(location.meta["rating"], json!(4.6));
    }

    #[test]
    fn flat_location_fields_survive_without_embedded_object() {
        let event = normalize_event(
            &json!({"locationId": 42, "locationName": "Station"}),
            &ids(),
        )
        .unwrap();
        assert_eq!(event.location_id.as_deref(), Some("42"));
        assert_eq!(event.location_name.as_deref(), Some("Station"));
        assert!(event.location.is_none());
    }

    #[test]
    fn priority_truncates_floats_and_strings() {
        let event = normalize_event(&json!({"priority": 2.9}), &ids()).unwrap();
        assert_eq!(event.priority, 2);
        let event = normalize_event(&json!({"priority": "3"}), &ids()).unwrap();
        assert_eq!(event.priority, 3);
    }

    #[test]
    fn non_object_payloads_are_rejected() {
        assert!(normalize_event(&json!("not an event"), &ids()).is_none());
        assert!(normalize_event(&json!(null), &ids()).is_none());
        assert!(normalize_day(&json!([1, 2]), &ids()).is_none());
    }

    #[test]
    fn day_short_date_derives_from_date() {
        let day = normalize_day(&json!({"date": "2026-03-07"}), &ids()).unwrap();
        assert_eq!(day.short_date.as_deref(), Some("3月7日"));

        let explicit = normalize_day(
            &json!({"date": "2026-03-07", "shortDate": "三月七日"}),
            &ids(),
        )
        .unwrap();
        assert_eq!(explicit.short_date.as_deref(), Some("三月七日"));
    }

    #[test]
    fn day_embeds_normalized_events() {
        let day = normalize_day(
            &json!({
                "date": "2026-03-07",
                "events": [{"title": "Breakfast"}, "garbage", {"title": "Museum"}]
            }),
            &ids(),
        )
        .unwrap();
        assert_eq!(day.events.len(), 2);
        assert_eq!(day.events[1].title.as_deref(), Some("Museum"));
    }

    #[test]
    fn weather_passes_through_untouched() {
        let event = normalize_event(
            &json!({"weather": {"temp": 21, "text": "晴"}}),
            &ids(),
        )
        .unwrap();
        assert_eq!(event.weather.to_value()["temp"], json!(21));
    }
}
