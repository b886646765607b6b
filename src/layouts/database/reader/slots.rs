// src/layouts/database/reader/slots.rs
use rusqlite::{params, params_from_iter, Connection, Row};

use super::super::error::DbResult;
use super::super::writer::helpers::build_placeholders;
use super::sanitize::{sanitize_body_slot, RawBodySlotRow};
use crate::layouts::slots::{BodySlot, SubsheetSlot, SubsheetSlotsConfig};

const SUBSHEET_SLOT_COLUMNS: &str =
    "LayoutID, SubsheetID, InfoTemplateID, SlotIndex, ColumnNumber, RowNumber";

fn map_subsheet_slot(row: &Row<'_>) -> rusqlite::Result<SubsheetSlot> {
    Ok(SubsheetSlot {
        layout_id: row.get(0)?,
        subsheet_id: row.get(1)?,
        info_template_id: row.get(2)?,
        slot_index: row.get(3)?,
        column_number: row.get(4)?,
        row_number: row.get(5)?,
    })
}

/// Field slots of one subsheet in SlotIndex order.
pub fn list_subsheet_slots(
    conn: &Connection,
    layout_id: i64,
    subsheet_id: i64,
) -> DbResult<Vec<SubsheetSlot>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM LayoutSubsheetSlots
         WHERE LayoutID = ? AND SubsheetID = ?
         ORDER BY SlotIndex",
        SUBSHEET_SLOT_COLUMNS
    ))?;
    let rows = stmt
        .query_map(params![layout_id, subsheet_id], map_subsheet_slot)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Field slots for several subsheets of one layout in a single query.
pub fn list_subsheet_slots_for(
    conn: &Connection,
    layout_id: i64,
    subsheet_ids: &[i64],
) -> DbResult<Vec<SubsheetSlot>> {
    if subsheet_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM LayoutSubsheetSlots
         WHERE LayoutID = ? AND SubsheetID IN ({})
         ORDER BY SubsheetID, SlotIndex",
        SUBSHEET_SLOT_COLUMNS,
        build_placeholders(subsheet_ids.len())
    ))?;
    let bind = std::iter::once(layout_id).chain(subsheet_ids.iter().copied());
    let rows = stmt
        .query_map(params_from_iter(bind), map_subsheet_slot)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn get_subsheet_slots_config(
    conn: &Connection,
    layout_id: i64,
    subsheet_id: i64,
) -> DbResult<SubsheetSlotsConfig> {
    let rows = list_subsheet_slots(conn, layout_id, subsheet_id)?;
    Ok(SubsheetSlotsConfig::from_rows(&rows))
}

/// Body slots sorted by SlotIndex, sanitized on the way out.
pub fn list_layout_body_slots(conn: &Connection, layout_id: i64) -> DbResult<Vec<BodySlot>> {
    let mut stmt = conn.prepare(
        "SELECT SlotIndex, SubsheetID, ColumnNumber, RowNumber, Width
         FROM LayoutBodySlots WHERE LayoutID = ?",
    )?;
    let raw_rows = stmt
        .query_map(params![layout_id], |row| {
            Ok(RawBodySlotRow {
                slot_index: row.get(0)?,
                subsheet_id: row.get(1)?,
                column_number: row.get(2)?,
                row_number: row.get(3)?,
                width: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let total = raw_rows.len();
    let mut slots: Vec<BodySlot> = raw_rows.iter().filter_map(sanitize_body_slot).collect();
    if slots.len() < total {
        tracing::warn!(
            "list_layout_body_slots: dropped {} unreadable body slot rows for layout {}",
            total - slots.len(),
            layout_id
        );
    }
    slots.sort_by_key(|slot| slot.slot_index);
    Ok(slots)
}
