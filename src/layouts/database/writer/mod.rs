// src/layouts/database/writer/mod.rs
// Main writer module - orchestrates all layout write operations

pub mod helpers;
pub mod slots;
mod structure;
mod test_helpers;

#[cfg(test)]
pub(crate) use test_helpers::*;

use super::error::DbResult;
use crate::layouts::definitions::{
    BlockPatch, LayoutMetaPatch, NewBlock, NewLayout, NewRegion, RegionPatch,
};
use crate::layouts::slots::{BodySlot, SubsheetSlotsPayload};
use rusqlite::Connection;

/// Database writer - provides all write operations
///
/// This struct delegates to specialized modules:
/// - `structure`: layout metadata, regions and blocks
/// - `slots`: transactional replace of subsheet and body slot sets
pub struct DbWriter;

impl DbWriter {
    // ============================================================================
    // STRUCTURE - See structure.rs
    // ============================================================================

    /// Create a layout seeded with header, body and footer regions
    pub fn create_layout(conn: &Connection, layout: &NewLayout) -> DbResult<i64> {
        structure::create_layout(conn, layout)
    }

    /// Partial metadata update; bumps the version
    pub fn update_layout_meta(
        conn: &Connection,
        layout_id: i64,
        patch: &LayoutMetaPatch,
    ) -> DbResult<()> {
        structure::update_layout_meta(conn, layout_id, patch)
    }

    /// Delete a layout with its regions, blocks and slots
    pub fn delete_layout(conn: &Connection, layout_id: i64) -> DbResult<()> {
        structure::delete_layout(conn, layout_id)
    }

    pub fn add_region(conn: &Connection, layout_id: i64, region: &NewRegion) -> DbResult<i64> {
        structure::add_region(conn, layout_id, region)
    }

    pub fn update_region(
        conn: &Connection,
        layout_id: i64,
        region_id: i64,
        patch: &RegionPatch,
    ) -> DbResult<()> {
        structure::update_region(conn, layout_id, region_id, patch)
    }

    /// Add a block to a dynamic region of the layout
    pub fn add_block(
        conn: &Connection,
        layout_id: i64,
        region_id: i64,
        block: &NewBlock,
    ) -> DbResult<i64> {
        structure::add_block(conn, layout_id, region_id, block)
    }

    pub fn update_block(
        conn: &Connection,
        layout_id: i64,
        block_id: i64,
        patch: &BlockPatch,
    ) -> DbResult<()> {
        structure::update_block(conn, layout_id, block_id, patch)
    }

    // ============================================================================
    // SLOTS - See slots.rs
    // ============================================================================

    /// Replace the field placement of one subsheet
    pub fn save_subsheet_slots(
        conn: &Connection,
        layout_id: i64,
        subsheet_id: i64,
        payload: &SubsheetSlotsPayload,
    ) -> DbResult<usize> {
        slots::save_subsheet_slots(conn, layout_id, subsheet_id, payload)
    }

    /// Replace the page-level subsheet placement of a layout
    pub fn save_layout_body_slots(
        conn: &Connection,
        layout_id: i64,
        rows: &[BodySlot],
    ) -> DbResult<usize> {
        slots::save_layout_body_slots(conn, layout_id, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layouts::database::error::DbError;
    use crate::layouts::database::DbReader;
    use crate::layouts::definitions::{BlockType, GridRect, Margins, RegionKind, SourceRef};
    use crate::layouts::slots::{SlotEntry, SubsheetSlot};
    use slots::{replace_all, SubsheetScope};

    fn body(slot_index: i64, subsheet_id: i64) -> BodySlot {
        BodySlot {
            slot_index,
            subsheet_id,
            column_number: 1,
            row_number: 1,
            width: 1,
        }
    }

    #[test]
    fn test_create_layout_seeds_three_regions() {
        let conn = setup_layout_db();
        let layout_id = create_test_layout(&conn);

        let bundle = DbReader::get_layout_bundle(&conn, layout_id).unwrap().unwrap();
        assert_eq!(bundle.meta.version, 1);
        let names: Vec<&str> = bundle.regions.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["header", "body", "footer"]);
        assert_eq!(bundle.regions[1].kind, RegionKind::Dynamic);
        assert!(bundle.blocks.is_empty());
    }

    #[test]
    fn test_update_meta_bumps_version() {
        let conn = setup_layout_db();
        let layout_id = create_test_layout(&conn);

        let patch = LayoutMetaPatch {
            grid_cols: Some(6),
            margins: Some(Margins { top_mm: 5.0, right_mm: 5.0, bottom_mm: 5.0, left_mm: 5.0 }),
            theme: Some(Some(serde_json::json!({"accent": "navy"}))),
            ..Default::default()
        };
        DbWriter::update_layout_meta(&conn, layout_id, &patch).unwrap();

        let meta = DbReader::get_layout_meta(&conn, layout_id).unwrap().unwrap();
        assert_eq!(meta.grid_cols, 6);
        assert_eq!(meta.margins.left_mm, 5.0);
        assert_eq!(meta.theme, Some(serde_json::json!({"accent": "navy"})));
        assert_eq!(meta.version, 2);

        let clear = LayoutMetaPatch { theme: Some(None), ..Default::default() };
        DbWriter::update_layout_meta(&conn, layout_id, &clear).unwrap();
        assert_eq!(DbReader::get_layout_meta(&conn, layout_id).unwrap().unwrap().theme, None);
    }

    #[test]
    fn test_update_meta_of_missing_layout() {
        let conn = setup_layout_db();
        let patch = LayoutMetaPatch { grid_cols: Some(4), ..Default::default() };
        assert!(matches!(
            DbWriter::update_layout_meta(&conn, 99, &patch),
            Err(DbError::LayoutNotFound(99))
        ));
    }

    #[test]
    fn test_blocks_only_go_into_dynamic_regions() {
        let conn = setup_layout_db();
        let layout_id = create_test_layout(&conn);
        let regions = DbReader::list_regions(&conn, layout_id).unwrap();
        let header = regions[0].region_id;
        let body_region = regions[1].region_id;

        let block = NewBlock {
            block_type: BlockType::Field,
            source_ref: Some(SourceRef::Field { info_template_id: 42 }),
            props: None,
            rect: GridRect::new(0, 0, 6, 1),
            order_index: 0,
        };
        assert!(matches!(
            DbWriter::add_block(&conn, layout_id, header, &block),
            Err(DbError::Validation(_))
        ));
        let block_id = DbWriter::add_block(&conn, layout_id, body_region, &block).unwrap();

        let patch = BlockPatch { w: Some(12), ..Default::default() };
        DbWriter::update_block(&conn, layout_id, block_id, &patch).unwrap();

        let blocks = DbReader::list_blocks(&conn, layout_id).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].rect.w, 12);
        assert_eq!(blocks[0].source_ref, Some(SourceRef::Field { info_template_id: 42 }));
    }

    #[test]
    fn test_region_and_block_updates_are_scoped_to_layout() {
        let conn = setup_layout_db();
        let first = create_test_layout(&conn);
        let second = create_test_layout(&conn);
        let region_of_first = DbReader::list_regions(&conn, first).unwrap()[1].region_id;

        let patch = RegionPatch { name: Some("main".into()), ..Default::default() };
        assert!(matches!(
            DbWriter::update_region(&conn, second, region_of_first, &patch),
            Err(DbError::RegionNotFound { .. })
        ));
        DbWriter::update_region(&conn, first, region_of_first, &patch).unwrap();

        let block_patch = BlockPatch { order_index: Some(1), ..Default::default() };
        assert!(matches!(
            DbWriter::update_block(&conn, first, 12345, &block_patch),
            Err(DbError::BlockNotFound { .. })
        ));
    }

    #[test]
    fn test_add_region_to_missing_layout() {
        let conn = setup_layout_db();
        let region = NewRegion {
            kind: RegionKind::Dynamic,
            name: "aside".into(),
            rect: GridRect::new(0, 0, 2, 2),
            order_index: 3,
        };
        assert!(matches!(
            DbWriter::add_region(&conn, 7, &region),
            Err(DbError::LayoutNotFound(7))
        ));
    }

    #[test]
    fn test_delete_layout_cascades_slots() {
        let conn = setup_layout_db();
        let layout_id = create_test_layout(&conn);
        DbWriter::save_layout_body_slots(&conn, layout_id, &[body(0, 5)]).unwrap();

        DbWriter::delete_layout(&conn, layout_id).unwrap();
        assert!(DbReader::get_layout_bundle(&conn, layout_id).unwrap().is_none());
        let remaining: i64 = conn
            .query_row("SELECT COUNT(*) FROM LayoutBodySlots", [], |r| r.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[test]
    fn test_replace_all_rolls_back_on_insert_failure() {
        let conn = setup_layout_db();
        let layout_id = create_test_layout(&conn);
        let payload = SubsheetSlotsPayload {
            merged: Some(false),
            left: Some(vec![SlotEntry { index: 0, info_template_id: 42 }]),
            right: None,
        };
        DbWriter::save_subsheet_slots(&conn, layout_id, 5, &payload).unwrap();

        // Bypass validation: the second row violates the per-field unique key.
        let slot = |slot_index| SubsheetSlot {
            layout_id,
            subsheet_id: 5,
            info_template_id: 7,
            slot_index,
            column_number: 1,
            row_number: 1,
        };
        let scope = SubsheetScope { layout_id, subsheet_id: 5 };
        assert!(replace_all(&conn, &scope, &[slot(0), slot(1)]).is_err());

        let rows = DbReader::list_subsheet_slots(&conn, layout_id, 5).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].info_template_id, 42);
    }

    #[test]
    fn test_slot_save_for_missing_layout() {
        let conn = setup_layout_db();
        assert!(matches!(
            DbWriter::save_layout_body_slots(&conn, 404, &[body(0, 5)]),
            Err(DbError::LayoutNotFound(404))
        ));
    }
}
