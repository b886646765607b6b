// src/layouts/slots.rs
// Slot assignment types: fields inside a subsheet, subsheets inside the page body.

use serde::{Deserialize, Serialize};

pub const LEFT_COLUMN: i64 = 1;
pub const RIGHT_COLUMN: i64 = 2;

/// One field placed in a subsheet column. `index` is the zero-based row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotEntry {
    pub index: u32,
    pub info_template_id: i64,
}

/// Save payload for a (layout, subsheet) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SubsheetSlotsPayload {
    pub merged: Option<bool>,
    pub left: Option<Vec<SlotEntry>>,
    pub right: Option<Vec<SlotEntry>>,
}

impl SubsheetSlotsPayload {
    pub fn entry_count(&self) -> usize {
        self.left.as_ref().map_or(0, Vec::len) + self.right.as_ref().map_or(0, Vec::len)
    }

    /// Rows to persist: left entries then right entries, ordered by
    /// (column, index), numbered 0..n in that order.
    pub fn to_rows(&self, layout_id: i64, subsheet_id: i64) -> Vec<SubsheetSlot> {
        let left = self.left.iter().flatten().map(|e| (LEFT_COLUMN, *e));
        let right = self.right.iter().flatten().map(|e| (RIGHT_COLUMN, *e));

        let mut placed: Vec<(i64, SlotEntry)> = left.chain(right).collect();
        // Stable: equal (column, index) pairs keep caller order.
        placed.sort_by_key(|(column, entry)| (*column, entry.index));

        placed
            .into_iter()
            .enumerate()
            .map(|(slot_index, (column_number, entry))| SubsheetSlot {
                layout_id,
                subsheet_id,
                info_template_id: entry.info_template_id,
                slot_index: slot_index as i64,
                column_number,
                row_number: i64::from(entry.index) + 1,
            })
            .collect()
    }
}

/// Read model for a (layout, subsheet) pair. `merged` is true when nothing
/// has been placed, telling the view to fall back to an unstructured list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsheetSlotsConfig {
    pub merged: bool,
    pub left: Vec<SlotEntry>,
    pub right: Vec<SlotEntry>,
}

impl SubsheetSlotsConfig {
    pub fn unstructured() -> Self {
        Self {
            merged: true,
            left: Vec::new(),
            right: Vec::new(),
        }
    }

    pub fn from_rows(rows: &[SubsheetSlot]) -> Self {
        if rows.is_empty() {
            return Self::unstructured();
        }
        let mut config = Self {
            merged: false,
            left: Vec::new(),
            right: Vec::new(),
        };
        for row in rows {
            let entry = SlotEntry {
                index: u32::try_from(row.row_number - 1).unwrap_or(0),
                info_template_id: row.info_template_id,
            };
            if row.column_number == RIGHT_COLUMN {
                config.right.push(entry);
            } else {
                config.left.push(entry);
            }
        }
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsheetSlot {
    pub layout_id: i64,
    pub subsheet_id: i64,
    pub info_template_id: i64,
    pub slot_index: i64,
    pub column_number: i64,
    pub row_number: i64,
}

impl SubsheetSlot {
    pub fn rank(&self) -> SlotRank {
        SlotRank {
            column: self.column_number,
            row: self.row_number,
            slot_index: self.slot_index,
        }
    }
}

/// A whole subsheet placed in the page-level grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodySlot {
    pub slot_index: i64,
    pub subsheet_id: i64,
    pub column_number: i64,
    pub row_number: i64,
    pub width: i64,
}

/// Placement order of a field inside its subsheet: column-major, then row,
/// then slot index. Field order matters for the derived `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SlotRank {
    pub column: i64,
    pub row: i64,
    pub slot_index: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(index: u32, info_template_id: i64) -> SlotEntry {
        SlotEntry { index, info_template_id }
    }

    #[test]
    fn test_rows_are_numbered_in_column_then_index_order() {
        let payload = SubsheetSlotsPayload {
            merged: Some(false),
            left: Some(vec![entry(1, 11), entry(0, 10)]),
            right: Some(vec![entry(0, 20), entry(2, 22)]),
        };
        let rows = payload.to_rows(7, 5);

        let ids: Vec<i64> = rows.iter().map(|r| r.info_template_id).collect();
        assert_eq!(ids, vec![10, 11, 20, 22]);
        let indices: Vec<i64> = rows.iter().map(|r| r.slot_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(rows[3].row_number, 3);
        assert_eq!(rows[2].column_number, RIGHT_COLUMN);
        assert!(rows.iter().all(|r| r.layout_id == 7 && r.subsheet_id == 5));
    }

    #[test]
    fn test_left_precedes_right_at_equal_index() {
        let payload = SubsheetSlotsPayload {
            merged: None,
            left: Some(vec![entry(0, 1)]),
            right: Some(vec![entry(0, 2)]),
        };
        let rows = payload.to_rows(1, 1);
        assert_eq!(rows[0].info_template_id, 1);
        assert_eq!(rows[1].info_template_id, 2);
    }

    #[test]
    fn test_config_from_no_rows_is_merged() {
        assert_eq!(SubsheetSlotsConfig::from_rows(&[]), SubsheetSlotsConfig::unstructured());
    }

    #[test]
    fn test_config_splits_columns() {
        let payload = SubsheetSlotsPayload {
            merged: None,
            left: Some(vec![entry(0, 1), entry(1, 3)]),
            right: Some(vec![entry(0, 2)]),
        };
        let config = SubsheetSlotsConfig::from_rows(&payload.to_rows(1, 1));
        assert!(!config.merged);
        assert_eq!(config.left, vec![entry(0, 1), entry(1, 3)]);
        assert_eq!(config.right, vec![entry(0, 2)]);
    }

    #[test]
    fn test_rank_orders_column_before_row() {
        let a = SlotRank { column: 1, row: 9, slot_index: 8 };
        let b = SlotRank { column: 2, row: 1, slot_index: 0 };
        let c = SlotRank { column: 1, row: 9, slot_index: 9 };
        assert!(a < b);
        assert!(a < c);
    }
}
