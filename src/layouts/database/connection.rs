// src/layouts/database/connection.rs

use super::error::DbResult;
use rusqlite::Connection;
use std::path::Path;

pub struct DbConnection;

impl DbConnection {
    /// Opens (or creates) the layout database with WAL mode and ensures the schema.
    pub fn open(path: &Path) -> DbResult<Connection> {
        let conn = Connection::open(path)?;

        // PRAGMA journal_mode=WAL returns the mode that was actually set
        let journal_mode: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;

        if journal_mode.to_uppercase() != "WAL" {
            tracing::warn!(
                "Failed to set WAL mode on database {:?}. Current mode: {}",
                path.file_name(),
                journal_mode
            );
        } else {
            tracing::debug!("WAL mode activated for database {:?}", path.file_name());
        }

        Self::configure(&conn)?;
        super::schema::ensure_layout_schema(&conn)?;
        Ok(conn)
    }

    /// In-memory database with the layout schema, for tests and dry runs.
    pub fn open_in_memory() -> DbResult<Connection> {
        let conn = Connection::open_in_memory()?;
        Self::configure(&conn)?;
        super::schema::ensure_layout_schema(&conn)?;
        Ok(conn)
    }

    // PRAGMA settings are per connection, so every open must apply them
    fn configure(conn: &Connection) -> DbResult<()> {
        conn.execute_batch(
            "PRAGMA synchronous=NORMAL;
             PRAGMA foreign_keys=ON;
             PRAGMA busy_timeout=5000;",
        )?;
        Ok(())
    }
}
