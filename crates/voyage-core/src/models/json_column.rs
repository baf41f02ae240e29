//! Boundary type for JSON-encoded text columns.
//!
//! Columns like `tags`, `images`, and `weather_json` hold JSON strings in
//! storage but arrays/objects on the client. [`JsonColumn`] keeps the three
//! possible states distinct instead of conflating "absent" and "unparseable"
//! into a bare `null`.

use serde_json::Value;

/// A JSON-string column at the storage/client boundary.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum JsonColumn {
    /// The column is missing or NULL, or its text failed to parse.
    #[default]
    Absent,

    /// Raw text as read from storage, not yet parsed.
    Raw(String),

    /// A parsed client-side value.
    Parsed(Value),
}

impl JsonColumn {
    /// Wraps an optional storage string. `None` and empty strings map to
    /// `Absent`.
    pub fn from_storage(text: Option<String>) -> Self {
        match text {
            Some(s) if !s.is_empty() => JsonColumn::Raw(s),
            _ => JsonColumn::Absent,
        }
    }

    /// Wraps an optional client value. JSON `null` maps to `Absent`.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Null) | None => JsonColumn::Absent,
            Some(v) => JsonColumn::Parsed(v.clone()),
        }
    }

    /// Parses raw text into a value, collapsing parse failure into `Absent`.
    pub fn parsed(self) -> Self {
        match self {
            JsonColumn::Raw(s) => match serde_json::from_str(&s) {
                Ok(v) => JsonColumn::Parsed(v),
                Err(_) => JsonColumn::Absent,
            },
            other => other,
        }
    }

    /// The client-facing value: parsed JSON, or `null` when absent.
    pub fn to_value(&self) -> Value {
        match self.clone().parsed() {
            JsonColumn::Parsed(v) => v,
            _ => Value::Null,
        }
    }

    /// The storage-facing text: serialized JSON, or `None` when absent.
    pub fn to_storage(&self) -> Option<String> {
        match self {
            JsonColumn::Absent => None,
            JsonColumn::Raw(s) => Some(s.clone()),
            JsonColumn::Parsed(v) => Some(v.to_string()),
        }
    }

    /// True when no value is present.
    pub fn is_absent(&self) -> bool {
        matches!(self, JsonColumn::Absent)
    }
}
