// src/layouts/database/schema/queries.rs
// Read-only schema queries

use super::super::error::{DbError, DbResult};
use rusqlite::Connection;

/// Check if a table exists in the database
pub fn table_exists(conn: &Connection, table_name: &str) -> DbResult<bool> {
    let count: i32 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?",
        [table_name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Verify table exists or return error
pub fn require_table(conn: &Connection, table_name: &str) -> DbResult<()> {
    if !table_exists(conn, table_name)? {
        return Err(DbError::Other(format!("Table not found: {}", table_name)));
    }
    Ok(())
}

/// Get list of existing columns in a table
pub fn get_table_columns(conn: &Connection, table_name: &str) -> DbResult<Vec<String>> {
    require_table(conn, table_name)?;

    let mut stmt = conn.prepare(&format!("PRAGMA table_info(\"{}\")", table_name))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}
