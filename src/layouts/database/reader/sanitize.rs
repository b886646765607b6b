// src/layouts/database/reader/sanitize.rs
// Body slot rows may come from older schema states; coerce them into typed
// values here instead of in the render path.

use rusqlite::types::Value;

use crate::layouts::slots::{BodySlot, LEFT_COLUMN, RIGHT_COLUMN};

/// Untyped body slot row exactly as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBodySlotRow {
    pub slot_index: Value,
    pub subsheet_id: Value,
    pub column_number: Value,
    pub row_number: Value,
    pub width: Value,
}

fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Integer(i) => *i as f64,
        Value::Real(r) => *r,
        Value::Text(t) => t.trim().parse::<f64>().ok()?,
        Value::Null | Value::Blob(_) => return None,
    };
    number.is_finite().then_some(number)
}

fn as_whole(value: &Value) -> Option<i64> {
    as_number(value)
        .filter(|n| n.fract() == 0.0)
        .map(|n| n as i64)
}

/// 1 or 2; anything other than exactly 2 falls back to 1.
fn one_or_two(value: &Value) -> i64 {
    match as_number(value) {
        Some(n) if n == 2.0 => RIGHT_COLUMN,
        _ => LEFT_COLUMN,
    }
}

/// Typed body slot, or `None` when the row cannot identify its slot or subsheet.
pub fn sanitize_body_slot(raw: &RawBodySlotRow) -> Option<BodySlot> {
    let slot_index = as_whole(&raw.slot_index).filter(|i| *i >= 0)?;
    let subsheet_id = as_whole(&raw.subsheet_id).filter(|i| *i > 0)?;
    let row_number = as_number(&raw.row_number)
        .map(|n| (n.round() as i64).max(1))
        .unwrap_or(1);

    Some(BodySlot {
        slot_index,
        subsheet_id,
        column_number: one_or_two(&raw.column_number),
        row_number,
        width: one_or_two(&raw.width),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(column: Value, row: Value, width: Value) -> RawBodySlotRow {
        RawBodySlotRow {
            slot_index: Value::Integer(0),
            subsheet_id: Value::Integer(5),
            column_number: column,
            row_number: row,
            width,
        }
    }

    #[test]
    fn test_clean_row_passes_through() {
        let slot = sanitize_body_slot(&raw(Value::Integer(2), Value::Integer(3), Value::Integer(2))).unwrap();
        assert_eq!(
            slot,
            BodySlot {
                slot_index: 0,
                subsheet_id: 5,
                column_number: 2,
                row_number: 3,
                width: 2
            }
        );
    }

    #[test]
    fn test_legacy_values_are_normalized() {
        let slot = sanitize_body_slot(&raw(Value::Null, Value::Text("abc".into()), Value::Real(2.0))).unwrap();
        assert_eq!(slot.column_number, 1);
        assert_eq!(slot.row_number, 1);
        assert_eq!(slot.width, 2);

        let slot = sanitize_body_slot(&raw(Value::Text(" 2 ".into()), Value::Real(-4.0), Value::Real(f64::NAN))).unwrap();
        assert_eq!(slot.column_number, 2);
        assert_eq!(slot.row_number, 1);
        assert_eq!(slot.width, 1);
    }

    #[test]
    fn test_out_of_range_column_and_width_default_to_one() {
        let slot = sanitize_body_slot(&raw(Value::Integer(9), Value::Integer(1), Value::Integer(7))).unwrap();
        assert_eq!(slot.column_number, 1);
        assert_eq!(slot.width, 1);

        let slot = sanitize_body_slot(&raw(Value::Real(1.6), Value::Integer(1), Value::Text("3".into()))).unwrap();
        assert_eq!(slot.column_number, 1);
        assert_eq!(slot.width, 1);
    }

    #[test]
    fn test_unidentifiable_rows_are_dropped() {
        let mut row = raw(Value::Integer(1), Value::Integer(1), Value::Integer(1));
        row.subsheet_id = Value::Null;
        assert!(sanitize_body_slot(&row).is_none());

        let mut row = raw(Value::Integer(1), Value::Integer(1), Value::Integer(1));
        row.slot_index = Value::Real(1.5);
        assert!(sanitize_body_slot(&row).is_none());
    }
}
