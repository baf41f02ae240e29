//! Database operations and SQLite management for trips, days, and events.
//!
//! This module provides low-level database operations for the Voyage
//! itinerary engine. It handles SQLite connections, schema management, and
//! specialized query interfaces for each entity, plus the schedule
//! assembly query.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod day_queries;
pub mod event_queries;
pub mod location_queries;
pub mod migrations;
pub mod ordering;
pub mod rows;
pub mod schedule_queries;
pub mod trip_queries;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,

    /// Cached `PRAGMA table_info` column lists, keyed by table name.
    /// Degraded SELECTs against older database files consult this instead
    /// of re-probing per query.
    table_columns: RefCell<HashMap<String, Vec<String>>>,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self {
            connection,
            table_columns: RefCell::new(HashMap::new()),
        };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Returns the column names of a table, probing `PRAGMA table_info`
    /// once and caching the result for the connection's lifetime.
    pub fn table_columns(&self, table: &str) -> Result<Vec<String>> {
        if let Some(columns) = self.table_columns.borrow().get(table) {
            return Ok(columns.clone());
        }

        let mut stmt = self
            .connection
            .prepare(&format!("PRAGMA table_info('{table}')"))
            .db_context("Failed to prepare table_info query")?;
        let columns = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .db_context("Failed to query table columns")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch table columns")?;

        self.table_columns
            .borrow_mut()
            .insert(table.to_string(), columns.clone());
        Ok(columns)
    }

    /// True when the table currently has the named column.
    pub fn has_column(&self, table: &str, column: &str) -> Result<bool> {
        Ok(self.table_columns(table)?.iter().any(|c| c == column))
    }

    /// Drops the cached column lists. Call after DDL changes.
    pub fn reset_schema_cache(&self) {
        self.table_columns.borrow_mut().clear();
    }
}
