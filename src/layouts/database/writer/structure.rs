// src/layouts/database/writer/structure.rs
// Layout metadata, regions and blocks

use super::super::error::{DbError, DbResult};
use super::super::reader::structure::layout_exists;
use super::helpers::{json_text, UpdateBuilder};
use crate::layouts::definitions::{
    BlockPatch, LayoutMetaPatch, NewBlock, NewLayout, NewRegion, RegionKind, RegionPatch,
};
use rusqlite::{params, Connection, OptionalExtension, ToSql};

pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Insert a layout together with its header, body and footer regions.
pub fn create_layout(conn: &Connection, layout: &NewLayout) -> DbResult<i64> {
    layout.validate()?;

    let now = now_timestamp();
    let tx = conn.unchecked_transaction()?;

    tx.execute(
        "INSERT INTO LayoutMeta (
            TemplateID, ClientID, PaperSize, Orientation, GridCols, GridGapMm,
            MarginTopMm, MarginRightMm, MarginBottomMm, MarginLeftMm,
            ThemeJSON, LockedHeaderJSON, LockedFooterJSON,
            Version, IsDefault, CreatedAt, UpdatedAt
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?, ?)",
        params![
            layout.template_id,
            layout.client_id,
            layout.paper_size,
            layout.orientation,
            layout.grid_cols,
            layout.grid_gap_mm,
            layout.margins.top_mm,
            layout.margins.right_mm,
            layout.margins.bottom_mm,
            layout.margins.left_mm,
            json_text(layout.theme.as_ref())?,
            json_text(layout.locked_header.as_ref())?,
            json_text(layout.locked_footer.as_ref())?,
            layout.is_default,
            now,
            now,
        ],
    )?;
    let layout_id = tx.last_insert_rowid();

    for region in layout.default_regions() {
        insert_region(&tx, layout_id, &region)?;
    }

    tx.commit()?;
    tracing::info!(
        "create_layout: layout {} created (template={:?}, client={:?})",
        layout_id,
        layout.template_id,
        layout.client_id
    );
    Ok(layout_id)
}

/// Apply a partial metadata update and bump the layout version.
pub fn update_layout_meta(conn: &Connection, layout_id: i64, patch: &LayoutMetaPatch) -> DbResult<()> {
    patch.validate()?;

    let mut update = UpdateBuilder::new();
    if let Some(template_id) = patch.template_id {
        update.set("TemplateID", template_id);
    }
    if let Some(client_id) = patch.client_id {
        update.set("ClientID", client_id);
    }
    if let Some(paper_size) = patch.paper_size {
        update.set("PaperSize", paper_size);
    }
    if let Some(orientation) = patch.orientation {
        update.set("Orientation", orientation);
    }
    if let Some(grid_cols) = patch.grid_cols {
        update.set("GridCols", grid_cols);
    }
    if let Some(gap) = patch.grid_gap_mm {
        update.set("GridGapMm", gap);
    }
    if let Some(margins) = patch.margins {
        update
            .set("MarginTopMm", margins.top_mm)
            .set("MarginRightMm", margins.right_mm)
            .set("MarginBottomMm", margins.bottom_mm)
            .set("MarginLeftMm", margins.left_mm);
    }
    if let Some(theme) = &patch.theme {
        update.set("ThemeJSON", json_text(theme.as_ref())?);
    }
    if let Some(header) = &patch.locked_header {
        update.set("LockedHeaderJSON", json_text(header.as_ref())?);
    }
    if let Some(footer) = &patch.locked_footer {
        update.set("LockedFooterJSON", json_text(footer.as_ref())?);
    }
    if let Some(is_default) = patch.is_default {
        update.set("IsDefault", is_default);
    }
    update
        .set_expr("Version", "Version + 1")
        .set("UpdatedAt", now_timestamp());

    let where_params: Vec<Box<dyn ToSql>> = vec![Box::new(layout_id)];
    let (sql, params_vec) = update.build("LayoutMeta", "LayoutID = ?", where_params);
    let updated = conn.execute(&sql, rusqlite::params_from_iter(params_vec.iter()))?;
    if updated == 0 {
        return Err(DbError::LayoutNotFound(layout_id));
    }

    tracing::debug!("update_layout_meta: layout {} updated", layout_id);
    Ok(())
}

/// Delete a layout. Regions, blocks and slots cascade.
pub fn delete_layout(conn: &Connection, layout_id: i64) -> DbResult<()> {
    let deleted = conn.execute("DELETE FROM LayoutMeta WHERE LayoutID = ?", params![layout_id])?;
    if deleted == 0 {
        return Err(DbError::LayoutNotFound(layout_id));
    }
    tracing::info!("delete_layout: layout {} deleted", layout_id);
    Ok(())
}

pub fn add_region(conn: &Connection, layout_id: i64, region: &NewRegion) -> DbResult<i64> {
    region.validate()?;

    let tx = conn.unchecked_transaction()?;
    if !layout_exists(&tx, layout_id)? {
        return Err(DbError::LayoutNotFound(layout_id));
    }
    let region_id = insert_region(&tx, layout_id, region)?;
    touch_layout(&tx, layout_id)?;
    tx.commit()?;

    tracing::debug!("add_region: region {} added to layout {}", region_id, layout_id);
    Ok(region_id)
}

pub fn update_region(
    conn: &Connection,
    layout_id: i64,
    region_id: i64,
    patch: &RegionPatch,
) -> DbResult<()> {
    patch.validate()?;

    let mut update = UpdateBuilder::new();
    if let Some(kind) = patch.kind {
        update.set("Kind", kind);
    }
    if let Some(name) = &patch.name {
        update.set("Name", name.trim().to_string());
    }
    set_rect(&mut update, patch.x, patch.y, patch.w, patch.h);
    if let Some(order_index) = patch.order_index {
        update.set("OrderIndex", order_index);
    }

    let tx = conn.unchecked_transaction()?;
    let where_params: Vec<Box<dyn ToSql>> = vec![Box::new(region_id), Box::new(layout_id)];
    let (sql, params_vec) = update.build("LayoutRegions", "RegionID = ? AND LayoutID = ?", where_params);
    let updated = tx.execute(&sql, rusqlite::params_from_iter(params_vec.iter()))?;
    if updated == 0 {
        return Err(DbError::RegionNotFound { layout_id, region_id });
    }
    touch_layout(&tx, layout_id)?;
    tx.commit()?;
    Ok(())
}

/// Add a block to one of the layout's dynamic regions.
pub fn add_block(conn: &Connection, layout_id: i64, region_id: i64, block: &NewBlock) -> DbResult<i64> {
    block.validate()?;

    let tx = conn.unchecked_transaction()?;
    let kind: Option<RegionKind> = tx
        .query_row(
            "SELECT Kind FROM LayoutRegions WHERE RegionID = ? AND LayoutID = ?",
            params![region_id, layout_id],
            |row| row.get(0),
        )
        .optional()?;

    match kind {
        None => return Err(DbError::RegionNotFound { layout_id, region_id }),
        Some(RegionKind::Locked) => {
            return Err(DbError::validation(format!(
                "region {} is locked and cannot host blocks",
                region_id
            )))
        }
        Some(RegionKind::Dynamic) => {}
    }

    tx.execute(
        "INSERT INTO LayoutBlocks (RegionID, BlockType, SourceRefJSON, PropsJSON, X, Y, W, H, OrderIndex)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            region_id,
            block.block_type,
            json_text(block.source_ref.as_ref())?,
            json_text(block.props.as_ref())?,
            block.rect.x,
            block.rect.y,
            block.rect.w,
            block.rect.h,
            block.order_index,
        ],
    )?;
    let block_id = tx.last_insert_rowid();
    touch_layout(&tx, layout_id)?;
    tx.commit()?;

    tracing::debug!(
        "add_block: block {} added to region {} of layout {}",
        block_id,
        region_id,
        layout_id
    );
    Ok(block_id)
}

pub fn update_block(conn: &Connection, layout_id: i64, block_id: i64, patch: &BlockPatch) -> DbResult<()> {
    patch.validate()?;

    let mut update = UpdateBuilder::new();
    if let Some(block_type) = patch.block_type {
        update.set("BlockType", block_type);
    }
    if let Some(source_ref) = &patch.source_ref {
        update.set("SourceRefJSON", json_text(source_ref.as_ref())?);
    }
    if let Some(props) = &patch.props {
        update.set("PropsJSON", json_text(props.as_ref())?);
    }
    set_rect(&mut update, patch.x, patch.y, patch.w, patch.h);
    if let Some(order_index) = patch.order_index {
        update.set("OrderIndex", order_index);
    }

    let tx = conn.unchecked_transaction()?;
    let where_params: Vec<Box<dyn ToSql>> = vec![Box::new(block_id), Box::new(layout_id)];
    let (sql, params_vec) = update.build(
        "LayoutBlocks",
        "BlockID = ? AND RegionID IN (SELECT RegionID FROM LayoutRegions WHERE LayoutID = ?)",
        where_params,
    );
    let updated = tx.execute(&sql, rusqlite::params_from_iter(params_vec.iter()))?;
    if updated == 0 {
        return Err(DbError::BlockNotFound { layout_id, block_id });
    }
    touch_layout(&tx, layout_id)?;
    tx.commit()?;
    Ok(())
}

fn insert_region(conn: &Connection, layout_id: i64, region: &NewRegion) -> DbResult<i64> {
    conn.execute(
        "INSERT INTO LayoutRegions (LayoutID, Kind, Name, X, Y, W, H, OrderIndex)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            layout_id,
            region.kind,
            region.name.trim(),
            region.rect.x,
            region.rect.y,
            region.rect.w,
            region.rect.h,
            region.order_index,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn set_rect(update: &mut UpdateBuilder, x: Option<u32>, y: Option<u32>, w: Option<u32>, h: Option<u32>) {
    for (column, value) in [("X", x), ("Y", y), ("W", w), ("H", h)] {
        if let Some(value) = value {
            update.set(column, value);
        }
    }
}

/// Structural changes to regions and blocks count as a new layout version.
fn touch_layout(conn: &Connection, layout_id: i64) -> DbResult<()> {
    conn.execute(
        "UPDATE LayoutMeta SET Version = Version + 1, UpdatedAt = ? WHERE LayoutID = ?",
        params![now_timestamp(), layout_id],
    )?;
    Ok(())
}
