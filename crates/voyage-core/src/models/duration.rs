//! Derived duration object computed from `durationMin`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Client-facing duration breakdown, derived from a minute count.
///
/// Never stored; computed post-fetch when a projection requests the
/// `duration` pseudo-field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DurationParts {
    pub hours: i64,
    pub minutes: i64,
    pub text: String,
}

impl DurationParts {
    /// Builds the breakdown from total minutes. Non-positive counts yield
    /// `None` (the client field stays absent).
    pub fn from_minutes(total: i64) -> Option<Self> {
        if total <= 0 {
            return None;
        }
        let hours = total / 60;
        let minutes = total % 60;
        let text = format_duration_text(total);
        Some(Self { hours, minutes, text })
    }
}

impl fmt::Display for DurationParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Formats minutes as the CJK duration label used across the UI, e.g.
/// `90` → `1小时30分钟`, `120` → `2小时`, `45` → `45分钟`.
pub fn format_duration_text(total: i64) -> String {
    if total <= 0 {
        return String::new();
    }
    let hours = total / 60;
    let minutes = total % 60;
    if hours > 0 && minutes > 0 {
        format!("{hours}小时{minutes}分钟")
    } else if hours > 0 {
        format!("{hours}小时")
    } else {
        format!("{minutes}分钟")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breaks_down_hours_and_minutes() {
        let d = DurationParts::from_minutes(90).unwrap();
        assert_eq!(d.hours, 1);
        assert_eq!(d.minutes, 30);
        assert_eq!(d.text, "1小时30分钟");
    }

    #[test]
    fn whole_hours_omit_minutes() {
        assert_eq!(format_duration_text(120), "2小时");
        assert_eq!(format_duration_text(45), "45分钟");
    }

    #[test]
    fn zero_minutes_yields_none() {
        assert!(DurationParts::from_minutes(0).is_none());
        assert!(DurationParts::from_minutes(-5).is_none());
    }
}
