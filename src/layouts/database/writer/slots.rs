// src/layouts/database/writer/slots.rs
// Slot sets are replaced as a whole: delete the scope, insert the new rows,
// all inside one transaction.

use super::super::error::{DbError, DbResult};
use super::super::reader::structure::layout_exists;
use super::super::validation::{validate_body_slots, validate_subsheet_slots};
use crate::layouts::slots::{BodySlot, SubsheetSlot, SubsheetSlotsPayload};
use rusqlite::{params, Connection, Statement};

/// A set of slot rows that is always replaced as a unit.
pub trait SlotScope {
    type Row;

    fn layout_id(&self) -> i64;

    fn delete_scope(&self, conn: &Connection) -> rusqlite::Result<usize>;

    fn insert_sql(&self) -> &'static str;

    fn insert_row(&self, stmt: &mut Statement<'_>, row: &Self::Row) -> rusqlite::Result<usize>;
}

/// Field slots of one subsheet within one layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubsheetScope {
    pub layout_id: i64,
    pub subsheet_id: i64,
}

impl SlotScope for SubsheetScope {
    type Row = SubsheetSlot;

    fn layout_id(&self) -> i64 {
        self.layout_id
    }

    fn delete_scope(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.execute(
            "DELETE FROM LayoutSubsheetSlots WHERE LayoutID = ? AND SubsheetID = ?",
            params![self.layout_id, self.subsheet_id],
        )
    }

    fn insert_sql(&self) -> &'static str {
        "INSERT INTO LayoutSubsheetSlots (LayoutID, SubsheetID, InfoTemplateID, SlotIndex, ColumnNumber, RowNumber)
         VALUES (?, ?, ?, ?, ?, ?)"
    }

    fn insert_row(&self, stmt: &mut Statement<'_>, row: &SubsheetSlot) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.layout_id,
            self.subsheet_id,
            row.info_template_id,
            row.slot_index,
            row.column_number,
            row.row_number,
        ])
    }
}

/// Subsheet placements in the page body of one layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyScope {
    pub layout_id: i64,
}

impl SlotScope for BodyScope {
    type Row = BodySlot;

    fn layout_id(&self) -> i64 {
        self.layout_id
    }

    fn delete_scope(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.execute(
            "DELETE FROM LayoutBodySlots WHERE LayoutID = ?",
            params![self.layout_id],
        )
    }

    fn insert_sql(&self) -> &'static str {
        "INSERT INTO LayoutBodySlots (LayoutID, SlotIndex, SubsheetID, ColumnNumber, RowNumber, Width)
         VALUES (?, ?, ?, ?, ?, ?)"
    }

    fn insert_row(&self, stmt: &mut Statement<'_>, row: &BodySlot) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.layout_id,
            row.slot_index,
            row.subsheet_id,
            row.column_number,
            row.row_number,
            row.width,
        ])
    }
}

/// Replace every row of `scope` with `rows`. Any failure rolls the whole
/// set back, so readers see either the old set or the new one.
pub fn replace_all<S: SlotScope>(conn: &Connection, scope: &S, rows: &[S::Row]) -> DbResult<usize> {
    let tx = conn.unchecked_transaction()?;

    if !layout_exists(&tx, scope.layout_id())? {
        return Err(DbError::LayoutNotFound(scope.layout_id()));
    }

    let removed = scope.delete_scope(&tx)?;
    {
        let mut stmt = tx.prepare(scope.insert_sql())?;
        for row in rows {
            scope.insert_row(&mut stmt, row)?;
        }
    }
    tx.commit()?;

    tracing::trace!("replace_all: removed {} rows, inserted {}", removed, rows.len());
    Ok(rows.len())
}

/// Save the left/right field placement of one subsheet.
pub fn save_subsheet_slots(
    conn: &Connection,
    layout_id: i64,
    subsheet_id: i64,
    payload: &SubsheetSlotsPayload,
) -> DbResult<usize> {
    validate_subsheet_slots(payload)?;

    let rows = payload.to_rows(layout_id, subsheet_id);
    let scope = SubsheetScope { layout_id, subsheet_id };
    let saved = replace_all(conn, &scope, &rows)?;

    tracing::info!(
        "save_subsheet_slots: layout {} subsheet {} -> {} slots",
        layout_id,
        subsheet_id,
        saved
    );
    Ok(saved)
}

/// Save the page-level placement of subsheets, in ascending slot order.
pub fn save_layout_body_slots(conn: &Connection, layout_id: i64, rows: &[BodySlot]) -> DbResult<usize> {
    validate_body_slots(rows)?;

    let mut ordered = rows.to_vec();
    ordered.sort_by_key(|row| row.slot_index);
    let saved = replace_all(conn, &BodyScope { layout_id }, &ordered)?;

    tracing::info!("save_layout_body_slots: layout {} -> {} body slots", layout_id, saved);
    Ok(saved)
}
