// src/cli/slots.rs
use std::fs;
use std::path::Path;

use crate::layouts::database::{DbConfig, DbReader, DbResult, DbWriter};
use crate::layouts::slots::{BodySlot, SubsheetSlotsPayload};

use super::layouts::open;
use super::print_json;

pub fn show_body(config: &DbConfig, layout_id: i64) -> DbResult<()> {
    let conn = open(config)?;
    print_json(&DbReader::list_layout_body_slots(&conn, layout_id)?)
}

pub fn save_body(config: &DbConfig, layout_id: i64, file: &Path) -> DbResult<()> {
    let slots: Vec<BodySlot> = serde_json::from_str(&fs::read_to_string(file)?)?;
    let conn = open(config)?;
    let saved = DbWriter::save_layout_body_slots(&conn, layout_id, &slots)?;
    println!("Saved {} body slots for layout {}", saved, layout_id);
    Ok(())
}

pub fn show_subsheet(config: &DbConfig, layout_id: i64, subsheet_id: i64) -> DbResult<()> {
    let conn = open(config)?;
    print_json(&DbReader::get_subsheet_slots_config(&conn, layout_id, subsheet_id)?)
}

pub fn save_subsheet(config: &DbConfig, layout_id: i64, subsheet_id: i64, file: &Path) -> DbResult<()> {
    let payload: SubsheetSlotsPayload = serde_json::from_str(&fs::read_to_string(file)?)?;
    let conn = open(config)?;
    let saved = DbWriter::save_subsheet_slots(&conn, layout_id, subsheet_id, &payload)?;
    println!(
        "Saved {} field slots for subsheet {} of layout {}",
        saved, subsheet_id, layout_id
    );
    Ok(())
}
