// src/layouts/database/reader/mod.rs
pub mod sanitize;
pub mod slots;
pub mod structure;

use super::error::DbResult;
use crate::layouts::definitions::{Block, LayoutBundle, LayoutFilter, LayoutMeta, Region};
use crate::layouts::slots::{BodySlot, SubsheetSlot, SubsheetSlotsConfig};
use rusqlite::Connection;

pub struct DbReader;

impl DbReader {
    pub fn layout_exists(conn: &Connection, layout_id: i64) -> DbResult<bool> {
        structure::layout_exists(conn, layout_id)
    }

    pub fn get_layout_meta(conn: &Connection, layout_id: i64) -> DbResult<Option<LayoutMeta>> {
        structure::get_layout_meta(conn, layout_id)
    }

    /// Layouts filtered by template and/or client association
    pub fn list_layouts(conn: &Connection, filter: &LayoutFilter) -> DbResult<Vec<LayoutMeta>> {
        structure::list_layouts(conn, filter)
    }

    pub fn list_regions(conn: &Connection, layout_id: i64) -> DbResult<Vec<Region>> {
        structure::list_regions(conn, layout_id)
    }

    pub fn list_blocks(conn: &Connection, layout_id: i64) -> DbResult<Vec<Block>> {
        structure::list_blocks(conn, layout_id)
    }

    /// Meta, regions and blocks; `None` when the layout does not exist
    pub fn get_layout_bundle(conn: &Connection, layout_id: i64) -> DbResult<Option<LayoutBundle>> {
        structure::get_layout_bundle(conn, layout_id)
    }

    pub fn list_subsheet_slots(
        conn: &Connection,
        layout_id: i64,
        subsheet_id: i64,
    ) -> DbResult<Vec<SubsheetSlot>> {
        slots::list_subsheet_slots(conn, layout_id, subsheet_id)
    }

    pub fn list_subsheet_slots_for(
        conn: &Connection,
        layout_id: i64,
        subsheet_ids: &[i64],
    ) -> DbResult<Vec<SubsheetSlot>> {
        slots::list_subsheet_slots_for(conn, layout_id, subsheet_ids)
    }

    /// `{merged, left, right}`; no rows reads as merged with empty columns
    pub fn get_subsheet_slots_config(
        conn: &Connection,
        layout_id: i64,
        subsheet_id: i64,
    ) -> DbResult<SubsheetSlotsConfig> {
        slots::get_subsheet_slots_config(conn, layout_id, subsheet_id)
    }

    pub fn list_layout_body_slots(conn: &Connection, layout_id: i64) -> DbResult<Vec<BodySlot>> {
        slots::list_layout_body_slots(conn, layout_id)
    }
}
