// src/layouts/database/validation.rs
// Payload checks that run before any slot write reaches the database

use std::collections::HashSet;

use super::error::{DbError, DbResult};
use crate::layouts::slots::{BodySlot, SubsheetSlotsPayload, LEFT_COLUMN, RIGHT_COLUMN};

/// A field may be placed at most once per subsheet.
pub fn validate_subsheet_slots(payload: &SubsheetSlotsPayload) -> DbResult<()> {
    let mut seen = HashSet::new();
    let entries = payload.left.iter().flatten().chain(payload.right.iter().flatten());
    for entry in entries {
        if entry.info_template_id <= 0 {
            return Err(DbError::validation(format!(
                "invalid infoTemplateId {}",
                entry.info_template_id
            )));
        }
        if !seen.insert(entry.info_template_id) {
            return Err(DbError::validation(format!(
                "infoTemplateId {} is placed more than once",
                entry.info_template_id
            )));
        }
    }
    Ok(())
}

pub fn validate_body_slots(rows: &[BodySlot]) -> DbResult<()> {
    let mut seen = HashSet::new();
    for row in rows {
        if row.slot_index < 0 {
            return Err(DbError::validation(format!(
                "slotIndex must be non-negative, got {}",
                row.slot_index
            )));
        }
        if !seen.insert(row.slot_index) {
            return Err(DbError::validation(format!(
                "duplicate slotIndex {}",
                row.slot_index
            )));
        }
        if row.subsheet_id <= 0 {
            return Err(DbError::validation(format!(
                "slot {} has invalid subsheetId {}",
                row.slot_index, row.subsheet_id
            )));
        }
        if row.column_number != LEFT_COLUMN && row.column_number != RIGHT_COLUMN {
            return Err(DbError::validation(format!(
                "slot {} has columnNumber {}, expected 1 or 2",
                row.slot_index, row.column_number
            )));
        }
        if row.row_number < 1 {
            return Err(DbError::validation(format!(
                "slot {} has rowNumber {}, expected 1 or more",
                row.slot_index, row.row_number
            )));
        }
        if row.width != 1 && row.width != 2 {
            return Err(DbError::validation(format!(
                "slot {} has width {}, expected 1 or 2",
                row.slot_index, row.width
            )));
        }
    }
    Ok(())
}
