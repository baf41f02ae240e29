//! Database schema initialization and migrations.

use crate::error::{DatabaseResultExt, Result, VoyageError};

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        // Enable foreign keys for this connection
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;

        // Execute the schema SQL
        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        // Apply migrations for existing databases
        self.apply_migrations()?;

        Ok(())
    }

    /// Apply database migrations for existing databases
    fn apply_migrations(&self) -> Result<()> {
        // Columns added after the first release; older files lack them.
        self.add_column_if_missing("event", "weather_json", "TEXT")?;
        self.add_column_if_missing("event", "is_deleted", "INTEGER NOT NULL DEFAULT 0")?;
        self.add_column_if_missing("event", "deleted_at", "INTEGER")?;
        self.add_column_if_missing("trip", "is_deleted", "INTEGER NOT NULL DEFAULT 0")?;
        self.add_column_if_missing("trip", "deleted_at", "INTEGER")?;

        Ok(())
    }

    fn add_column_if_missing(&self, table: &str, column: &str, definition: &str) -> Result<()> {
        let has_column: bool = self
            .connection
            .query_row(
                &format!("SELECT COUNT(*) FROM pragma_table_info('{table}') WHERE name = ?1"),
                [column],
                |row| row.get(0),
            )
            .map(|count: i64| count > 0)
            .unwrap_or(false);

        if !has_column {
            self.connection
                .execute(&format!("ALTER TABLE {table} ADD COLUMN {column} {definition}"), [])
                .map_err(|e| {
                    VoyageError::database_error(
                        &format!("Failed to add {column} column to {table} table"),
                        e,
                    )
                })?;
            self.reset_schema_cache();
        }

        Ok(())
    }
}
