// src/layouts/database/schema/datasheet_tables.rs
// Reference schema for the datasheet tables the render pipeline reads.
// In production these belong to the sheet service; here they back tests and
// local tooling.

use rusqlite::Connection;

use super::super::error::DbResult;

pub const TRANSLATIONS_TABLE: &str = "InfoTemplateTranslations";

pub fn ensure_datasheet_tables(conn: &Connection, with_translations: bool) -> DbResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS Sheets (
            SheetID INTEGER PRIMARY KEY,
            EquipmentTagNum TEXT,
            EquipmentName TEXT,
            ProjectRef TEXT
        );

        CREATE TABLE IF NOT EXISTS SheetHeaderValues (
            SheetID INTEGER NOT NULL REFERENCES Sheets(SheetID) ON DELETE CASCADE,
            FieldLabel TEXT NOT NULL,
            FieldValue TEXT,
            UOM TEXT,
            SortOrder INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS SubSheets (
            SubID INTEGER PRIMARY KEY,
            SubName TEXT
        );

        CREATE TABLE IF NOT EXISTS InformationTemplates (
            InfoTemplateID INTEGER PRIMARY KEY,
            SubID INTEGER NOT NULL,
            Label TEXT NOT NULL,
            UOM TEXT,
            OrderIndex INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS InfoTemplateGroups (
            InfoTemplateID INTEGER PRIMARY KEY REFERENCES InformationTemplates(InfoTemplateID),
            GroupKey TEXT NOT NULL,
            CellIndex INTEGER,
            CellCaption TEXT
        );

        CREATE TABLE IF NOT EXISTS InformationValues (
            InfoValueID INTEGER PRIMARY KEY AUTOINCREMENT,
            InfoTemplateID INTEGER NOT NULL,
            SheetID INTEGER NOT NULL,
            InfoValue TEXT,
            UOM TEXT,
            RevisionNum INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_InformationValues_Sheet
            ON InformationValues(SheetID, InfoTemplateID);",
    )?;

    if with_translations {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS InfoTemplateTranslations (
                InfoTemplateID INTEGER NOT NULL,
                LangCode TEXT NOT NULL,
                Label TEXT NOT NULL,
                PRIMARY KEY (InfoTemplateID, LangCode)
            );",
        )?;
    }

    Ok(())
}
