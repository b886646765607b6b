// src/layouts/database/reader/structure.rs
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::super::error::DbResult;
use crate::layouts::definitions::{
    Block, GridRect, LayoutBundle, LayoutFilter, LayoutMeta, Margins, Region,
};

const META_COLUMNS: &str = "LayoutID, TemplateID, ClientID, PaperSize, Orientation, GridCols, GridGapMm,
    MarginTopMm, MarginRightMm, MarginBottomMm, MarginLeftMm,
    ThemeJSON, LockedHeaderJSON, LockedFooterJSON, Version, IsDefault, CreatedAt, UpdatedAt";

/// LayoutMeta row with JSON columns still as text.
struct MetaRow {
    meta: LayoutMeta,
    theme: Option<String>,
    locked_header: Option<String>,
    locked_footer: Option<String>,
}

fn map_meta_row(row: &Row<'_>) -> rusqlite::Result<MetaRow> {
    Ok(MetaRow {
        meta: LayoutMeta {
            layout_id: row.get(0)?,
            template_id: row.get(1)?,
            client_id: row.get(2)?,
            paper_size: row.get(3)?,
            orientation: row.get(4)?,
            grid_cols: row.get(5)?,
            grid_gap_mm: row.get(6)?,
            margins: Margins {
                top_mm: row.get(7)?,
                right_mm: row.get(8)?,
                bottom_mm: row.get(9)?,
                left_mm: row.get(10)?,
            },
            theme: None,
            locked_header: None,
            locked_footer: None,
            version: row.get(14)?,
            is_default: row.get(15)?,
            created_at: row.get(16)?,
            updated_at: row.get(17)?,
        },
        theme: row.get(11)?,
        locked_header: row.get(12)?,
        locked_footer: row.get(13)?,
    })
}

fn parse_json(text: Option<String>) -> DbResult<Option<serde_json::Value>> {
    Ok(text.as_deref().map(serde_json::from_str).transpose()?)
}

impl MetaRow {
    fn into_meta(self) -> DbResult<LayoutMeta> {
        let mut meta = self.meta;
        meta.theme = parse_json(self.theme)?;
        meta.locked_header = parse_json(self.locked_header)?;
        meta.locked_footer = parse_json(self.locked_footer)?;
        Ok(meta)
    }
}

pub fn layout_exists(conn: &Connection, layout_id: i64) -> DbResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM LayoutMeta WHERE LayoutID = ?",
            params![layout_id],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

pub fn get_layout_meta(conn: &Connection, layout_id: i64) -> DbResult<Option<LayoutMeta>> {
    let row = conn
        .query_row(
            &format!("SELECT {} FROM LayoutMeta WHERE LayoutID = ?", META_COLUMNS),
            params![layout_id],
            map_meta_row,
        )
        .optional()?;
    row.map(MetaRow::into_meta).transpose()
}

/// Layouts matching every filter criterion that is set, oldest first.
pub fn list_layouts(conn: &Connection, filter: &LayoutFilter) -> DbResult<Vec<LayoutMeta>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM LayoutMeta
         WHERE (?1 IS NULL OR TemplateID = ?1)
           AND (?2 IS NULL OR ClientID = ?2)
         ORDER BY LayoutID",
        META_COLUMNS
    ))?;
    let rows = stmt
        .query_map(params![filter.template_id, filter.client_id], map_meta_row)?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter().map(MetaRow::into_meta).collect()
}

pub fn list_regions(conn: &Connection, layout_id: i64) -> DbResult<Vec<Region>> {
    let mut stmt = conn.prepare(
        "SELECT RegionID, LayoutID, Kind, Name, X, Y, W, H, OrderIndex
         FROM LayoutRegions WHERE LayoutID = ? ORDER BY OrderIndex, RegionID",
    )?;
    let regions = stmt
        .query_map(params![layout_id], |row| {
            Ok(Region {
                region_id: row.get(0)?,
                layout_id: row.get(1)?,
                kind: row.get(2)?,
                name: row.get(3)?,
                rect: GridRect::new(row.get(4)?, row.get(5)?, row.get(6)?, row.get(7)?),
                order_index: row.get(8)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(regions)
}

/// Blocks of every region of the layout, grouped by region order.
pub fn list_blocks(conn: &Connection, layout_id: i64) -> DbResult<Vec<Block>> {
    let mut stmt = conn.prepare(
        "SELECT b.BlockID, b.RegionID, b.BlockType, b.SourceRefJSON, b.PropsJSON,
                b.X, b.Y, b.W, b.H, b.OrderIndex
         FROM LayoutBlocks b
         JOIN LayoutRegions r ON r.RegionID = b.RegionID
         WHERE r.LayoutID = ?
         ORDER BY r.OrderIndex, r.RegionID, b.OrderIndex, b.BlockID",
    )?;
    let raw = stmt
        .query_map(params![layout_id], |row| {
            let block = Block {
                block_id: row.get(0)?,
                region_id: row.get(1)?,
                block_type: row.get(2)?,
                source_ref: None,
                props: None,
                rect: GridRect::new(row.get(5)?, row.get(6)?, row.get(7)?, row.get(8)?),
                order_index: row.get(9)?,
            };
            let source_ref: Option<String> = row.get(3)?;
            let props: Option<String> = row.get(4)?;
            Ok((block, source_ref, props))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    raw.into_iter()
        .map(|(mut block, source_ref, props)| -> DbResult<Block> {
            block.source_ref = source_ref.as_deref().map(serde_json::from_str).transpose()?;
            block.props = parse_json(props)?;
            Ok(block)
        })
        .collect()
}

pub fn get_layout_bundle(conn: &Connection, layout_id: i64) -> DbResult<Option<LayoutBundle>> {
    let Some(meta) = get_layout_meta(conn, layout_id)? else {
        return Ok(None);
    };
    Ok(Some(LayoutBundle {
        meta,
        regions: list_regions(conn, layout_id)?,
        blocks: list_blocks(conn, layout_id)?,
    }))
}
