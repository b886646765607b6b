// src/cli/render.rs
use crate::layouts::database::{DbConfig, DbResult};
use crate::layouts::render::{render_layout, RenderRequest};
use crate::layouts::source::SqliteSheetSource;
use crate::layouts::translation::TranslationCache;
use crate::layouts::uom::UnitSystem;

use super::layouts::open;
use super::print_json;

pub fn run(
    config: &DbConfig,
    layout_id: i64,
    sheet_id: i64,
    uom: UnitSystem,
    lang: String,
    default_language: &str,
) -> DbResult<()> {
    let conn = open(config)?;
    let source = SqliteSheetSource::new(&conn);
    let cache = TranslationCache::new(default_language);
    let request = RenderRequest {
        layout_id,
        sheet_id,
        uom,
        lang,
    };
    let payload = render_layout(&conn, &source, &cache, &request)?;
    print_json(&payload)
}
