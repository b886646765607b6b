// src/layouts/database/writer/test_helpers.rs
// Test utilities for database writer and reader tests

#![cfg(test)]

use rusqlite::{params, Connection};

use crate::layouts::database::schema::ensure_datasheet_tables;
use crate::layouts::database::{DbConnection, DbWriter};
use crate::layouts::definitions::NewLayout;

/// In-memory database with layout tables and the reference datasheet tables.
pub fn setup_layout_db() -> Connection {
    let conn = DbConnection::open_in_memory().unwrap();
    ensure_datasheet_tables(&conn, true).unwrap();
    conn
}

/// Create a layout with default settings and return its id.
pub fn create_test_layout(conn: &Connection) -> i64 {
    DbWriter::create_layout(conn, &NewLayout::default()).unwrap()
}

/// Insert a field template, optionally with grouping metadata.
pub fn insert_template(conn: &Connection, info_template_id: i64, sub_id: i64, label: &str, uom: Option<&str>) {
    conn.execute(
        "INSERT INTO InformationTemplates (InfoTemplateID, SubID, Label, UOM) VALUES (?, ?, ?, ?)",
        params![info_template_id, sub_id, label, uom],
    )
    .unwrap();
}

pub fn insert_value(
    conn: &Connection,
    info_template_id: i64,
    sheet_id: i64,
    value: Option<&str>,
    uom: Option<&str>,
    revision: Option<i64>,
) {
    conn.execute(
        "INSERT INTO InformationValues (InfoTemplateID, SheetID, InfoValue, UOM, RevisionNum)
         VALUES (?, ?, ?, ?, ?)",
        params![info_template_id, sheet_id, value, uom, revision],
    )
    .unwrap();
}
