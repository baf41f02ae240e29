//! Contiguous order maintenance for days and top-level events.
//!
//! Both hierarchies keep a dense 0-based order within their scope: days
//! within a trip, top-level events within a day. Child events of a multi
//! card never participate. Every helper here runs against the caller's
//! connection, so ordering shifts and the dependent insert or delete
//! commit in one transaction.

use rusqlite::{params, Connection};

use crate::error::{DatabaseResultExt, Result};

/// The ordering scope: which rows form one dense sequence.
#[derive(Debug, Clone, Copy)]
pub enum OrderScope<'a> {
    /// Days of a trip, ordered by `day_order`.
    Days { trip_id: &'a str },

    /// Top-level live events of a day, ordered by `event_order`.
    Events { trip_id: &'a str, day_id: &'a str },
}

/// Number of rows currently in the scope.
pub fn count(conn: &Connection, scope: OrderScope<'_>) -> Result<i64> {
    match scope {
        OrderScope::Days { trip_id } => conn
            .query_row(
                "SELECT COUNT(*) FROM day WHERE trip_id = ?1",
                params![trip_id],
                |row| row.get(0),
            )
            .db_context("Failed to count days"),
        OrderScope::Events { trip_id, day_id } => conn
            .query_row(
                "SELECT COUNT(*) FROM event WHERE trip_id = ?1 AND day_id = ?2 \
                 AND parent_event_id IS NULL AND is_deleted = 0",
                params![trip_id, day_id],
                |row| row.get(0),
            )
            .db_context("Failed to count events"),
    }
}

/// Clamps a requested insert position into `[0, count]`.
/// `None` appends.
pub fn clamp_position(position: Option<i64>, count: i64) -> i64 {
    match position {
        None => count,
        Some(p) => p.clamp(0, count),
    }
}

/// Shifts every row at or after `position` up by `width`, opening a gap
/// for that many inserts.
pub fn open_gap(conn: &Connection, scope: OrderScope<'_>, position: i64, width: i64) -> Result<()> {
    if width == 0 {
        return Ok(());
    }
    match scope {
        OrderScope::Days { trip_id } => conn
            .execute(
                "UPDATE day SET day_order = day_order + ?1 \
                 WHERE trip_id = ?2 AND day_order >= ?3",
                params![width, trip_id, position],
            )
            .db_context("Failed to shift day orders")?,
        OrderScope::Events { trip_id, day_id } => conn
            .execute(
                "UPDATE event SET event_order = event_order + ?1 \
                 WHERE trip_id = ?2 AND day_id = ?3 AND event_order >= ?4 \
                 AND parent_event_id IS NULL AND is_deleted = 0",
                params![width, trip_id, day_id, position],
            )
            .db_context("Failed to shift event orders")?,
    };
    Ok(())
}

/// Shifts every row after `removed_position` down by one, closing the gap
/// a removal left behind.
pub fn close_gap(conn: &Connection, scope: OrderScope<'_>, removed_position: i64) -> Result<()> {
    match scope {
        OrderScope::Days { trip_id } => conn
            .execute(
                "UPDATE day SET day_order = day_order - 1 \
                 WHERE trip_id = ?1 AND day_order > ?2",
                params![trip_id, removed_position],
            )
            .db_context("Failed to close day order gap")?,
        OrderScope::Events { trip_id, day_id } => conn
            .execute(
                "UPDATE event SET event_order = event_order - 1 \
                 WHERE trip_id = ?1 AND day_id = ?2 AND event_order > ?3 \
                 AND parent_event_id IS NULL AND is_deleted = 0",
                params![trip_id, day_id, removed_position],
            )
            .db_context("Failed to close event order gap")?,
    };
    Ok(())
}

/// Overwrites the scope's ordering with the given id sequence: the row
/// with `ids[i]` gets order `i`.
pub fn assign_sequence(conn: &Connection, scope: OrderScope<'_>, ids: &[String]) -> Result<()> {
    for (order, id) in ids.iter().enumerate() {
        match scope {
            OrderScope::Days { trip_id } => conn
                .execute(
                    "UPDATE day SET day_order = ?1 WHERE trip_id = ?2 AND day_id = ?3",
                    params![order as i64, trip_id, id],
                )
                .db_context("Failed to assign day order")?,
            OrderScope::Events { trip_id, day_id } => conn
                .execute(
                    "UPDATE event SET event_order = ?1 \
                     WHERE trip_id = ?2 AND day_id = ?3 AND event_id = ?4 \
                     AND parent_event_id IS NULL AND is_deleted = 0",
                    params![order as i64, trip_id, day_id, id],
                )
                .db_context("Failed to assign event order")?,
        };
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_clamp_into_range() {
        assert_eq!(clamp_position(None, 3), 3);
        assert_eq!(clamp_position(Some(-5), 3), 0);
        assert_eq!(clamp_position(Some(1), 3), 1);
        assert_eq!(clamp_position(Some(99), 3), 3);
        assert_eq!(clamp_position(Some(0), 0), 0);
    }
}
