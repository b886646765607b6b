// src/layouts/database/schema/table_creation.rs

use rusqlite::Connection;

use super::super::error::DbResult;
use super::migrations::{apply_pending, Migration};
use super::queries::get_table_columns;

const BODY_SLOT_PLACEMENT_COLUMNS: [&str; 3] = ["ColumnNumber", "RowNumber", "Width"];

const LAYOUT_MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Created layout structure and slot tables",
        apply: create_layout_tables,
    },
    Migration {
        version: 2,
        description: "Added slot lookup indexes",
        apply: create_slot_indexes,
    },
    Migration {
        version: 3,
        description: "Added placement columns to legacy body slot tables",
        apply: add_body_slot_placement_columns,
    },
];

/// Create the layout tables and apply pending migrations.
pub fn ensure_layout_schema(conn: &Connection) -> DbResult<()> {
    let applied = apply_pending(conn, LAYOUT_MIGRATIONS)?;
    if applied > 0 {
        tracing::info!("Layout schema: applied {} migrations", applied);
    }
    Ok(())
}

/// Migration 1: structure and slot tables
fn create_layout_tables(conn: &Connection) -> DbResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS LayoutMeta (
            LayoutID INTEGER PRIMARY KEY AUTOINCREMENT,
            TemplateID INTEGER,
            ClientID INTEGER,
            PaperSize TEXT NOT NULL DEFAULT 'a4',
            Orientation TEXT NOT NULL DEFAULT 'portrait',
            GridCols INTEGER NOT NULL DEFAULT 12,
            GridGapMm REAL NOT NULL DEFAULT 4,
            MarginTopMm REAL NOT NULL DEFAULT 10,
            MarginRightMm REAL NOT NULL DEFAULT 10,
            MarginBottomMm REAL NOT NULL DEFAULT 10,
            MarginLeftMm REAL NOT NULL DEFAULT 10,
            ThemeJSON TEXT,
            LockedHeaderJSON TEXT,
            LockedFooterJSON TEXT,
            Version INTEGER NOT NULL DEFAULT 1,
            IsDefault INTEGER NOT NULL DEFAULT 0,
            CreatedAt TEXT NOT NULL,
            UpdatedAt TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS LayoutRegions (
            RegionID INTEGER PRIMARY KEY AUTOINCREMENT,
            LayoutID INTEGER NOT NULL REFERENCES LayoutMeta(LayoutID) ON DELETE CASCADE,
            Kind TEXT NOT NULL CHECK (Kind IN ('locked', 'dynamic')),
            Name TEXT NOT NULL,
            X INTEGER NOT NULL DEFAULT 0,
            Y INTEGER NOT NULL DEFAULT 0,
            W INTEGER NOT NULL DEFAULT 1,
            H INTEGER NOT NULL DEFAULT 1,
            OrderIndex INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS LayoutBlocks (
            BlockID INTEGER PRIMARY KEY AUTOINCREMENT,
            RegionID INTEGER NOT NULL REFERENCES LayoutRegions(RegionID) ON DELETE CASCADE,
            BlockType TEXT NOT NULL,
            SourceRefJSON TEXT,
            PropsJSON TEXT,
            X INTEGER NOT NULL DEFAULT 0,
            Y INTEGER NOT NULL DEFAULT 0,
            W INTEGER NOT NULL DEFAULT 1,
            H INTEGER NOT NULL DEFAULT 1,
            OrderIndex INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS LayoutSubsheetSlots (
            LayoutID INTEGER NOT NULL REFERENCES LayoutMeta(LayoutID) ON DELETE CASCADE,
            SubsheetID INTEGER NOT NULL,
            InfoTemplateID INTEGER NOT NULL,
            SlotIndex INTEGER NOT NULL,
            ColumnNumber INTEGER NOT NULL CHECK (ColumnNumber IN (1, 2)),
            RowNumber INTEGER NOT NULL,
            UNIQUE (LayoutID, SubsheetID, InfoTemplateID),
            UNIQUE (LayoutID, SubsheetID, SlotIndex)
        );

        -- Placement columns carry no type affinity: rows written by older
        -- schema states may hold text or nulls and are sanitized on read.
        CREATE TABLE IF NOT EXISTS LayoutBodySlots (
            LayoutID INTEGER NOT NULL REFERENCES LayoutMeta(LayoutID) ON DELETE CASCADE,
            SlotIndex INTEGER NOT NULL,
            SubsheetID INTEGER NOT NULL,
            ColumnNumber,
            RowNumber,
            Width,
            UNIQUE (LayoutID, SlotIndex)
        );",
    )?;
    tx.commit()?;
    Ok(())
}

/// Migration 2: lookup indexes for render-time reads
fn create_slot_indexes(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_LayoutRegions_LayoutID ON LayoutRegions(LayoutID);
         CREATE INDEX IF NOT EXISTS idx_LayoutBlocks_RegionID ON LayoutBlocks(RegionID);
         CREATE INDEX IF NOT EXISTS idx_LayoutSubsheetSlots_Scope ON LayoutSubsheetSlots(LayoutID, SubsheetID);
         CREATE INDEX IF NOT EXISTS idx_LayoutMeta_Scope ON LayoutMeta(TemplateID, ClientID);",
    )?;
    Ok(())
}

/// Migration 3: body slot tables created before placement existed only
/// held (LayoutID, SlotIndex, SubsheetID).
fn add_body_slot_placement_columns(conn: &Connection) -> DbResult<()> {
    let existing = get_table_columns(conn, "LayoutBodySlots")?;
    for column in BODY_SLOT_PLACEMENT_COLUMNS {
        if !existing.iter().any(|c| c.eq_ignore_ascii_case(column)) {
            conn.execute_batch(&format!("ALTER TABLE LayoutBodySlots ADD COLUMN {}", column))?;
            tracing::info!("Added {} to LayoutBodySlots", column);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::queries::{get_table_columns, table_exists};
    use super::*;

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_layout_schema(&conn).unwrap();
        ensure_layout_schema(&conn).unwrap();

        for table in [
            "LayoutMeta",
            "LayoutRegions",
            "LayoutBlocks",
            "LayoutSubsheetSlots",
            "LayoutBodySlots",
        ] {
            assert!(table_exists(&conn, table).unwrap(), "{} missing", table);
        }

        let versions: i32 = conn
            .query_row("SELECT COUNT(*) FROM _SchemaVersions", [], |r| r.get(0))
            .unwrap();
        assert_eq!(versions, 3);
    }

    #[test]
    fn test_body_slot_columns() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_layout_schema(&conn).unwrap();
        let cols = get_table_columns(&conn, "LayoutBodySlots").unwrap();
        assert_eq!(
            cols,
            vec!["LayoutID", "SlotIndex", "SubsheetID", "ColumnNumber", "RowNumber", "Width"]
        );
    }

    #[test]
    fn test_legacy_body_slot_table_gains_placement_columns() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE LayoutBodySlots (
                LayoutID INTEGER NOT NULL,
                SlotIndex INTEGER NOT NULL,
                SubsheetID INTEGER NOT NULL
            );",
        )
        .unwrap();
        ensure_layout_schema(&conn).unwrap();

        let cols = get_table_columns(&conn, "LayoutBodySlots").unwrap();
        assert_eq!(
            cols,
            vec!["LayoutID", "SlotIndex", "SubsheetID", "ColumnNumber", "RowNumber", "Width"]
        );
    }
}
