//! Location model definition.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::JsonColumn;

/// A shared place referenced by events through `location_id`.
///
/// Ids come from an external map provider (or are positive integers);
/// saves are last-write-wins upserts with no history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Externally supplied identifier
    pub id: String,

    /// Display name
    pub name: Option<String>,

    /// Street address
    pub address: Option<String>,

    /// Latitude
    pub lat: Option<f64>,

    /// Longitude
    pub lng: Option<f64>,

    /// Opaque provider payload (POI record), stored as JSON text
    #[serde(skip_serializing_if = "Value::is_null", default)]
    pub meta: Value,
}

impl Location {
    /// Extracts a savable location from a client payload, applying the id
    /// normalization rule. Returns `None` when no usable id is present.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let id = normalize_location_id(
            payload
                .get("locationId")
                .or_else(|| payload.get("id"))
                .or_else(|| payload.pointer("/poi/id"))
                .unwrap_or(&Value::Null),
        )?;

        let as_str = |key: &str| {
            payload
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Some(Self {
            id,
            name: as_str("name"),
            address: as_str("address"),
            lat: payload.get("lat").and_then(Value::as_f64),
            lng: payload.get("lng").and_then(Value::as_f64),
            meta: JsonColumn::from_value(payload.get("poi")).to_value(),
        })
    }
}

/// Normalizes a client-supplied location id.
///
/// Non-empty strings are trimmed and kept; numbers are accepted only when
/// they truncate to a positive integer. Everything else is `None`.
pub fn normalize_location_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => {
            let i = n.as_f64()?.trunc() as i64;
            if i > 0 {
                Some(i.to_string())
            } else {
                None
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_ids_are_trimmed() {
        assert_eq!(normalize_location_id(&json!(" B0FF123 ")), Some("B0FF123".to_string()));
        assert_eq!(normalize_location_id(&json!("")), None);
        assert_eq!(normalize_location_id(&json!("   ")), None);
    }

    #[test]
    fn numeric_ids_must_be_positive_integers() {
        assert_eq!(normalize_location_id(&json!(42)), Some("42".to_string()));
        assert_eq!(normalize_location_id(&json!(42.9)), Some("42".to_string()));
        assert_eq!(normalize_location_id(&json!(0)), None);
        assert_eq!(normalize_location_id(&json!(-3)), None);
    }

    #[test]
    fn payload_prefers_explicit_id_over_poi() {
        let loc = Location::from_payload(&json!({
            "id": "L1",
            "name": "West Lake",
            "lat": 30.2,
            "lng": 120.1,
            "poi": {"id": "B0FF999", "rating": 4.8}
        }))
        .unwrap();
        assert_eq!(loc.id, "L1");
        assert_eq!(loc.name.as_deref(), Some("West Lake"));
        assert_eq!(loc.meta["rating"], json!(4.8));
    }

    #[test]
    fn payload_falls_back_to_nested_poi_id() {
        let loc = Location::from_payload(&json!({"poi": {"id": "B0FF999"}})).unwrap();
        assert_eq!(loc.id, "B0FF999");
    }

    #[test]
    fn payload_without_id_is_rejected() {
        assert!(Location::from_payload(&json!({"name": "nowhere"})).is_none());
    }
}
