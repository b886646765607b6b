// src/layouts/source/sqlite.rs

use std::collections::HashMap;

use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use super::{
    FieldTemplateRow, FieldValueCandidate, HeaderFieldRow, SheetDataSource, SheetHeaderRow,
    TranslationSource,
};
use crate::layouts::database::error::DbResult;
use crate::layouts::database::schema::datasheet_tables::TRANSLATIONS_TABLE;
use crate::layouts::database::schema::queries::table_exists;
use crate::layouts::database::writer::helpers::build_placeholders;

// Stay well below SQLite's bound-parameter limit
const IN_CLAUSE_CHUNK: usize = 500;

/// Datasheet lookups against the reference datasheet tables.
pub struct SqliteSheetSource<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteSheetSource<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl SheetDataSource for SqliteSheetSource<'_> {
    fn sheet_header(&self, sheet_id: i64) -> DbResult<Option<SheetHeaderRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT SheetID, EquipmentTagNum, EquipmentName, ProjectRef FROM Sheets WHERE SheetID = ?",
                params![sheet_id],
                |row| {
                    Ok(SheetHeaderRow {
                        sheet_id: row.get(0)?,
                        equipment_tag_num: row.get(1)?,
                        equipment_name: row.get(2)?,
                        project_ref: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    fn header_fields(&self, sheet_id: i64) -> DbResult<Vec<HeaderFieldRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT FieldLabel, FieldValue, UOM, SortOrder FROM SheetHeaderValues
             WHERE SheetID = ? ORDER BY SortOrder, rowid",
        )?;
        let rows = stmt
            .query_map(params![sheet_id], |row| {
                Ok(HeaderFieldRow {
                    label: row.get(0)?,
                    value: row.get(1)?,
                    uom: row.get(2)?,
                    sort_order: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn field_templates(&self, subsheet_ids: &[i64]) -> DbResult<Vec<FieldTemplateRow>> {
        let mut templates = Vec::new();
        for chunk in subsheet_ids.chunks(IN_CLAUSE_CHUNK) {
            let mut stmt = self.conn.prepare(&format!(
                "SELECT t.InfoTemplateID, t.SubID, t.Label, t.UOM, g.GroupKey, g.CellIndex, g.CellCaption
                 FROM InformationTemplates t
                 LEFT JOIN InfoTemplateGroups g ON g.InfoTemplateID = t.InfoTemplateID
                 WHERE t.SubID IN ({})
                 ORDER BY t.SubID, t.OrderIndex, t.InfoTemplateID",
                build_placeholders(chunk.len())
            ))?;
            let rows = stmt.query_map(params_from_iter(chunk.iter()), |row| {
                Ok(FieldTemplateRow {
                    info_template_id: row.get(0)?,
                    subsheet_id: row.get(1)?,
                    label: row.get(2)?,
                    uom: row.get(3)?,
                    group_key: row.get(4)?,
                    cell_index: row.get(5)?,
                    cell_caption: row.get(6)?,
                })
            })?;
            for row in rows {
                templates.push(row?);
            }
        }
        Ok(templates)
    }

    fn field_values(&self, sheet_id: i64, subsheet_id: i64) -> DbResult<Vec<FieldValueCandidate>> {
        let mut stmt = self.conn.prepare(
            "SELECT v.InfoTemplateID, v.InfoValue, v.UOM, v.RevisionNum
             FROM InformationValues v
             JOIN InformationTemplates t ON t.InfoTemplateID = v.InfoTemplateID
             WHERE v.SheetID = ? AND t.SubID = ?",
        )?;
        let rows = stmt
            .query_map(params![sheet_id, subsheet_id], |row| {
                Ok(FieldValueCandidate {
                    info_template_id: row.get(0)?,
                    value: row.get(1)?,
                    uom: row.get(2)?,
                    revision: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn subsheet_names(&self, subsheet_ids: &[i64]) -> DbResult<HashMap<i64, String>> {
        let mut names = HashMap::new();
        for chunk in subsheet_ids.chunks(IN_CLAUSE_CHUNK) {
            let mut stmt = self.conn.prepare(&format!(
                "SELECT SubID, SubName FROM SubSheets WHERE SubID IN ({}) AND SubName IS NOT NULL",
                build_placeholders(chunk.len())
            ))?;
            let rows = stmt.query_map(params_from_iter(chunk.iter()), |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?;
            for row in rows {
                let (id, name) = row?;
                names.insert(id, name);
            }
        }
        Ok(names)
    }
}

impl TranslationSource for SqliteSheetSource<'_> {
    fn translations_available(&self) -> DbResult<bool> {
        table_exists(self.conn, TRANSLATIONS_TABLE)
    }

    fn template_labels(&self, info_template_ids: &[i64], lang: &str) -> DbResult<Vec<(i64, String)>> {
        let mut labels = Vec::new();
        for chunk in info_template_ids.chunks(IN_CLAUSE_CHUNK) {
            let mut stmt = self.conn.prepare(&format!(
                "SELECT InfoTemplateID, Label FROM {}
                 WHERE LOWER(LangCode) = LOWER(?) AND InfoTemplateID IN ({})",
                TRANSLATIONS_TABLE,
                build_placeholders(chunk.len())
            ))?;
            let mut bind: Vec<&dyn rusqlite::ToSql> = vec![&lang];
            bind.extend(chunk.iter().map(|id| id as &dyn rusqlite::ToSql));
            let rows = stmt.query_map(bind.as_slice(), |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?;
            for row in rows {
                labels.push(row?);
            }
        }
        Ok(labels)
    }
}
