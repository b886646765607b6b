// src/layouts/database/schema/migrations.rs
// Versioned layout schema steps, recorded in _SchemaVersions.

use super::super::error::DbResult;
use rusqlite::{params, Connection, OptionalExtension};

/// One schema step. Steps run in version order and each runs at most once
/// per database.
pub struct Migration {
    pub version: i32,
    pub description: &'static str,
    pub apply: fn(&Connection) -> DbResult<()>,
}

pub fn ensure_migration_tracking(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS _SchemaVersions (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL,
            description TEXT
        )",
        [],
    )?;
    Ok(())
}

pub fn is_migration_applied(conn: &Connection, version: i32) -> DbResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM _SchemaVersions WHERE version = ?",
            params![version],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Highest applied version, 0 for a fresh database.
pub fn current_version(conn: &Connection) -> DbResult<i32> {
    let version: Option<i32> =
        conn.query_row("SELECT MAX(version) FROM _SchemaVersions", [], |row| row.get(0))?;
    Ok(version.unwrap_or(0))
}

/// Apply every step not yet recorded and return how many ran.
pub fn apply_pending(conn: &Connection, migrations: &[Migration]) -> DbResult<usize> {
    ensure_migration_tracking(conn)?;

    let mut applied = 0;
    for migration in migrations {
        if is_migration_applied(conn, migration.version)? {
            continue;
        }
        (migration.apply)(conn)?;
        conn.execute(
            "INSERT OR IGNORE INTO _SchemaVersions (version, applied_at, description) VALUES (?, ?, ?)",
            params![migration.version, chrono::Utc::now().to_rfc3339(), migration.description],
        )?;
        tracing::debug!("Layout schema v{}: {}", migration.version, migration.description);
        applied += 1;
    }
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_marker_table(conn: &Connection) -> DbResult<()> {
        conn.execute_batch("CREATE TABLE Marker (id INTEGER)")?;
        Ok(())
    }

    fn fail(_: &Connection) -> DbResult<()> {
        Err(crate::layouts::database::DbError::Other("step failed".into()))
    }

    #[test]
    fn test_steps_run_once_in_order() {
        let conn = Connection::open_in_memory().unwrap();
        let steps = [Migration {
            version: 1,
            description: "marker table",
            apply: create_marker_table,
        }];
        assert_eq!(apply_pending(&conn, &steps).unwrap(), 1);
        // A second run would fail on CREATE TABLE if the step ran again
        assert_eq!(apply_pending(&conn, &steps).unwrap(), 0);
        assert_eq!(current_version(&conn).unwrap(), 1);
    }

    #[test]
    fn test_failed_step_is_not_recorded() {
        let conn = Connection::open_in_memory().unwrap();
        let steps = [Migration {
            version: 4,
            description: "always fails",
            apply: fail,
        }];
        assert!(apply_pending(&conn, &steps).is_err());
        assert!(!is_migration_applied(&conn, 4).unwrap());
        assert_eq!(current_version(&conn).unwrap(), 0);
    }
}
