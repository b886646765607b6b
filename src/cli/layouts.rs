// src/cli/layouts.rs
use crate::layouts::database::schema::ensure_datasheet_tables;
use crate::layouts::database::{DbConfig, DbConnection, DbError, DbReader, DbResult, DbWriter};
use crate::layouts::definitions::{LayoutFilter, NewLayout};
use rusqlite::Connection;

use super::print_json;

pub(crate) fn open(config: &DbConfig) -> DbResult<Connection> {
    config.ensure_directories()?;
    DbConnection::open(&config.database_path)
}

pub fn init(config: &DbConfig, with_datasheets: bool) -> DbResult<()> {
    let conn = open(config)?;
    if with_datasheets {
        ensure_datasheet_tables(&conn, true)?;
    }
    println!("Layout schema ready at {}", config.database_path.display());
    Ok(())
}

pub fn create(
    config: &DbConfig,
    template_id: Option<i64>,
    client_id: Option<i64>,
    paper: &str,
    orientation: &str,
    grid_cols: u32,
    is_default: bool,
) -> DbResult<()> {
    let conn = open(config)?;
    let layout = NewLayout {
        template_id,
        client_id,
        paper_size: paper.parse()?,
        orientation: orientation.parse()?,
        grid_cols,
        is_default,
        ..Default::default()
    };
    let layout_id = DbWriter::create_layout(&conn, &layout)?;
    println!("Created layout {}", layout_id);
    Ok(())
}

pub fn list(config: &DbConfig, template_id: Option<i64>, client_id: Option<i64>) -> DbResult<()> {
    let conn = open(config)?;
    let layouts = DbReader::list_layouts(&conn, &LayoutFilter { template_id, client_id })?;

    println!(
        "{:<8} {:<10} {:<8} {:<8} {:<10} {:<8} {}",
        "Layout", "Template", "Client", "Paper", "Orient.", "Version", "Default"
    );
    println!("{}", "-".repeat(68));
    for meta in layouts {
        println!(
            "{:<8} {:<10} {:<8} {:<8} {:<10} {:<8} {}",
            meta.layout_id,
            meta.template_id.map_or("-".to_string(), |id| id.to_string()),
            meta.client_id.map_or("-".to_string(), |id| id.to_string()),
            meta.paper_size,
            meta.orientation,
            meta.version,
            if meta.is_default { "yes" } else { "" }
        );
    }
    Ok(())
}

pub fn show(config: &DbConfig, layout_id: i64) -> DbResult<()> {
    let conn = open(config)?;
    let bundle = DbReader::get_layout_bundle(&conn, layout_id)?.ok_or(DbError::LayoutNotFound(layout_id))?;
    print_json(&bundle)
}

pub fn delete(config: &DbConfig, layout_id: i64) -> DbResult<()> {
    let conn = open(config)?;
    DbWriter::delete_layout(&conn, layout_id)?;
    println!("Deleted layout {}", layout_id);
    Ok(())
}
