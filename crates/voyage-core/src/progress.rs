//! Trip completion aggregation.
//!
//! Progress is derived from the event hierarchy at read time and never
//! stored. Child events of a multi card count as settled when they are
//! completed *or* inactive (deselecting an alternative settles it);
//! childless top-level events count only when completed — an inactive
//! top-level event is still an open decision.

use serde_json::Value;

use crate::models::EventState;

/// The slice of an event row that progress needs.
#[derive(Debug, Clone)]
pub struct ProgressRow {
    pub id: String,
    pub parent_event_id: Option<String>,
    pub state: EventState,
}

impl ProgressRow {
    /// Builds a row from a loose JSON event object. Unknown or missing
    /// states fall back to active.
    pub fn from_json(event: &Value) -> Option<Self> {
        let id = event
            .get("event_id")
            .or_else(|| event.get("id"))
            .and_then(Value::as_str)?
            .to_string();
        let parent_event_id = event
            .get("parent_event_id")
            .or_else(|| event.get("parentEventId"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let state = event
            .get("state")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or(EventState::Active);
        Some(Self {
            id,
            parent_event_id,
            state,
        })
    }
}

/// Computes a trip's completion percentage from all of its events.
///
/// Multi cards contribute through their children, never themselves: a
/// parent with children is excluded from the denominator. A child whose
/// parent row is absent (the parent was deleted without its children) is
/// unreachable from any day view and is excluded too. The result is
/// `round(100 * done / total)`; a trip with no countable events is 0.
pub fn compute_progress(rows: &[ProgressRow]) -> u8 {
    let mut total = 0u64;
    let mut done = 0u64;

    for row in rows {
        let is_parent = rows
            .iter()
            .any(|other| other.parent_event_id.as_deref() == Some(row.id.as_str()));
        if is_parent {
            continue;
        }

        if let Some(parent_id) = row.parent_event_id.as_deref() {
            let parent_live = rows.iter().any(|other| other.id == parent_id);
            if !parent_live {
                continue;
            }
        }

        total += 1;
        let settled = match row.state {
            EventState::Completed => true,
            EventState::Inactive => row.parent_event_id.is_some(),
            EventState::Active => false,
        };
        if settled {
            done += 1;
        }
    }

    if total == 0 {
        return 0;
    }

    ((100.0 * done as f64 / total as f64).round() as u64).min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, parent: Option<&str>, state: EventState) -> ProgressRow {
        ProgressRow {
            id: id.to_string(),
            parent_event_id: parent.map(str::to_string),
            state,
        }
    }

    #[test]
    fn empty_trip_is_zero() {
        assert_eq!(compute_progress(&[]), 0);
    }

    #[test]
    fn top_level_events_count_only_when_completed() {
        let rows = vec![
            row("a", None, EventState::Completed),
            row("b", None, EventState::Inactive),
            row("c", None, EventState::Active),
        ];
        // 1 of 3 done; inactive at top level is still open.
        assert_eq!(compute_progress(&rows), 33);
    }

    #[test]
    fn inactive_children_count_as_settled() {
        let rows = vec![
            row("parent", None, EventState::Active),
            row("a", Some("parent"), EventState::Completed),
            row("b", Some("parent"), EventState::Inactive),
        ];
        // The parent is excluded; both children are settled.
        assert_eq!(compute_progress(&rows), 100);
    }

    #[test]
    fn parent_state_never_counts() {
        let rows = vec![
            row("parent", None, EventState::Completed),
            row("a", Some("parent"), EventState::Active),
        ];
        assert_eq!(compute_progress(&rows), 0);
    }

    #[test]
    fn orphaned_children_are_excluded() {
        // The parent was deleted but its children were left behind; they
        // are unreachable from any day and must not drag progress down.
        let rows = vec![
            row("a", None, EventState::Completed),
            row("x", Some("ghost"), EventState::Active),
        ];
        assert_eq!(compute_progress(&rows), 100);
    }

    #[test]
    fn result_is_rounded() {
        let rows = vec![
            row("a", None, EventState::Completed),
            row("b", None, EventState::Completed),
            row("c", None, EventState::Active),
        ];
        // 2/3 → 66.67 → 67.
        assert_eq!(compute_progress(&rows), 67);
    }

    #[test]
    fn mixed_hierarchy() {
        let rows = vec![
            row("e1", None, EventState::Completed),
            row("multi", None, EventState::Active),
            row("m1", Some("multi"), EventState::Inactive),
            row("m2", Some("multi"), EventState::Active),
            row("e2", None, EventState::Active),
        ];
        // Countable: e1, m1, m2, e2. Done: e1, m1 → 50%.
        assert_eq!(compute_progress(&rows), 50);
    }

    #[test]
    fn rows_parse_from_loose_json() {
        let rows: Vec<ProgressRow> = [
            serde_json::json!({"event_id": "a", "state": "completed"}),
            serde_json::json!({"id": "b", "parentEventId": "a", "state": "bogus"}),
            serde_json::json!({"state": "completed"}),
        ]
        .iter()
        .filter_map(ProgressRow::from_json)
        .collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].state, EventState::Completed);
        assert_eq!(rows[1].state, EventState::Active);
        assert_eq!(rows[1].parent_event_id.as_deref(), Some("a"));
    }
}
