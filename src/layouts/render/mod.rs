// src/layouts/render/mod.rs
// Render pipeline: joins a layout's placements with one sheet's live values.

pub mod ordering;
pub mod payload;

pub use payload::{RenderField, RenderHeader, RenderPayload, RenderRequest, RenderSubsheet};

use std::collections::{BTreeSet, HashMap};

use rusqlite::Connection;

use super::database::error::{DbError, DbResult, RenderContext, RenderStage};
use super::database::reader::slots::{list_layout_body_slots, list_subsheet_slots_for};
use super::slots::{BodySlot, SlotRank};
use super::source::{FieldTemplateRow, FieldValueCandidate, SheetDataSource, TranslationSource};
use super::translation::TranslationCache;
use super::uom::{format_field_value, get_converted_uom, UnitSystem};

/// Template id used for header labels, which belong to no field template.
pub const HEADER_TEMPLATE_ID: i64 = 0;

/// Produce the positioned, converted and translated payload for one sheet.
///
/// Layout placements come from `conn`; sheet data and translations come from
/// `source`. Any failed read aborts with `DbError::Render` naming the stage.
pub fn render_layout<S>(
    conn: &Connection,
    source: &S,
    cache: &TranslationCache,
    request: &RenderRequest,
) -> DbResult<RenderPayload>
where
    S: SheetDataSource + TranslationSource,
{
    let header = render_header(source, cache, request)?;
    let mut payload = RenderPayload {
        layout_id: request.layout_id,
        sheet_id: request.sheet_id,
        uom: request.uom,
        lang: request.lang.clone(),
        header,
        body: Vec::new(),
    };

    let body_slots = list_layout_body_slots(conn, request.layout_id).at_stage(RenderStage::BodySlots)?;
    if body_slots.is_empty() {
        tracing::debug!("render_layout: layout {} has no body slots", request.layout_id);
        return Ok(payload);
    }

    let subsheet_ids = distinct(body_slots.iter().map(|slot| slot.subsheet_id));
    let templates = source
        .field_templates(&subsheet_ids)
        .at_stage(RenderStage::Templates)?;
    if templates.is_empty() {
        tracing::debug!(
            "render_layout: no field templates for subsheets {:?} of layout {}",
            subsheet_ids,
            request.layout_id
        );
        return Ok(payload);
    }

    let placements = list_subsheet_slots_for(conn, request.layout_id, &subsheet_ids)
        .at_stage(RenderStage::SubsheetSlots)?;
    let ranks = ordering::rank_map(&placements);

    let template_ids = distinct(templates.iter().map(|t| t.info_template_id));
    cache
        .prime(source, &template_ids, &request.lang)
        .at_stage(RenderStage::TranslationPriming)?;

    let mut values: HashMap<i64, FieldValueCandidate> = HashMap::new();
    for subsheet_id in distinct(templates.iter().map(|t| t.subsheet_id)) {
        let candidates = source
            .field_values(request.sheet_id, subsheet_id)
            .at_stage(RenderStage::FieldValues)?;
        values.extend(ordering::select_latest_values(candidates));
    }

    let names = source
        .subsheet_names(&subsheet_ids)
        .at_stage(RenderStage::SubsheetNames)?;

    payload.body = body_slots
        .iter()
        .map(|slot| render_subsheet(slot, &templates, &ranks, &values, &names, cache, request))
        .collect();

    tracing::info!(
        "Rendered layout {} for sheet {}: {} subsheets, {} fields ({}, lang '{}')",
        request.layout_id,
        request.sheet_id,
        payload.body.len(),
        payload.field_count(),
        request.uom,
        request.lang
    );
    Ok(payload)
}

fn render_header<S>(source: &S, cache: &TranslationCache, request: &RenderRequest) -> DbResult<RenderHeader>
where
    S: SheetDataSource + TranslationSource,
{
    let sheet = source
        .sheet_header(request.sheet_id)
        .at_stage(RenderStage::SheetHeader)?
        .ok_or(DbError::SheetNotFound(request.sheet_id))?;
    let rows = source
        .header_fields(request.sheet_id)
        .at_stage(RenderStage::HeaderFields)?;

    cache
        .prime(source, &[HEADER_TEMPLATE_ID], &request.lang)
        .at_stage(RenderStage::TranslationPriming)?;

    let fields = rows
        .into_iter()
        .map(|row| {
            let label = cache.get(HEADER_TEMPLATE_ID, &row.label, &request.lang);
            build_field(HEADER_TEMPLATE_ID, label, row.value, row.uom, request.uom)
        })
        .collect();

    Ok(RenderHeader {
        equipment_tag_num: sheet.equipment_tag_num,
        equipment_name: sheet.equipment_name,
        project: sheet.project_ref,
        fields,
    })
}

fn render_subsheet(
    slot: &BodySlot,
    templates: &[FieldTemplateRow],
    ranks: &HashMap<(i64, i64), SlotRank>,
    values: &HashMap<i64, FieldValueCandidate>,
    names: &HashMap<i64, String>,
    cache: &TranslationCache,
    request: &RenderRequest,
) -> RenderSubsheet {
    let fields = ordering::placed_fields(templates, slot.subsheet_id, ranks)
        .into_iter()
        .map(|(template, _)| {
            let stored = values.get(&template.info_template_id);
            let raw_value = stored.and_then(|v| v.value.clone());
            // A unit stored with the value overrides the template's unit
            let raw_uom = stored
                .and_then(|v| non_blank(v.uom.as_deref()))
                .or_else(|| non_blank(template.uom.as_deref()));
            let label = cache.get(template.info_template_id, &template.label, &request.lang);

            let mut field = build_field(template.info_template_id, label, raw_value, raw_uom, request.uom);
            field.group_key = template.group_key.clone();
            field.cell_index = template.cell_index;
            field.cell_caption = template.cell_caption.clone();
            field
        })
        .collect();

    RenderSubsheet {
        subsheet_id: slot.subsheet_id,
        subsheet_name: ordering::resolve_subsheet_name(slot.subsheet_id, names.get(&slot.subsheet_id)),
        slot_index: slot.slot_index,
        column_number: slot.column_number,
        row_number: slot.row_number,
        width: slot.width,
        fields,
    }
}

fn build_field(
    info_template_id: i64,
    label: String,
    raw_value: Option<String>,
    raw_uom: Option<String>,
    target: UnitSystem,
) -> RenderField {
    let raw_uom = non_blank(raw_uom.as_deref());
    let value = raw_value
        .as_deref()
        .map(|v| format_field_value(target, v, raw_uom.as_deref(), false, None))
        .unwrap_or_default();
    let uom = raw_uom.as_deref().map(|unit| get_converted_uom(target, unit));

    RenderField {
        info_template_id,
        label,
        raw_value,
        raw_uom,
        value,
        uom,
        group_key: None,
        cell_index: None,
        cell_caption: None,
    }
}

fn non_blank(text: Option<&str>) -> Option<String> {
    text.map(str::trim).filter(|t| !t.is_empty()).map(str::to_string)
}

fn distinct(ids: impl Iterator<Item = i64>) -> Vec<i64> {
    ids.collect::<BTreeSet<_>>().into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layouts::database::writer::{create_test_layout, setup_layout_db};
    use crate::layouts::database::DbWriter;
    use crate::layouts::slots::{SlotEntry, SubsheetSlotsPayload};
    use crate::layouts::source::{HeaderFieldRow, SheetHeaderRow};
    use std::cell::RefCell;

    #[derive(Default)]
    struct MockSource {
        templates: Vec<FieldTemplateRow>,
        values: Vec<FieldValueCandidate>,
        names: HashMap<i64, String>,
        translations: Vec<(i64, String)>,
        fail_values: bool,
        value_queries: RefCell<Vec<i64>>,
    }

    impl SheetDataSource for MockSource {
        fn sheet_header(&self, sheet_id: i64) -> DbResult<Option<SheetHeaderRow>> {
            Ok((sheet_id == 100).then(|| SheetHeaderRow {
                sheet_id,
                equipment_tag_num: Some("P-101".into()),
                equipment_name: Some("Feed Pump".into()),
                project_ref: Some("PRJ-7".into()),
            }))
        }

        fn header_fields(&self, _sheet_id: i64) -> DbResult<Vec<HeaderFieldRow>> {
            Ok(vec![HeaderFieldRow {
                label: "Design Pressure".into(),
                value: Some("1000".into()),
                uom: Some("kPa".into()),
                sort_order: 1,
            }])
        }

        fn field_templates(&self, subsheet_ids: &[i64]) -> DbResult<Vec<FieldTemplateRow>> {
            Ok(self
                .templates
                .iter()
                .filter(|t| subsheet_ids.contains(&t.subsheet_id))
                .cloned()
                .collect())
        }

        fn field_values(&self, _sheet_id: i64, subsheet_id: i64) -> DbResult<Vec<FieldValueCandidate>> {
            if self.fail_values {
                return Err(DbError::Other("disk I/O error".into()));
            }
            self.value_queries.borrow_mut().push(subsheet_id);
            let ids: Vec<i64> = self
                .templates
                .iter()
                .filter(|t| t.subsheet_id == subsheet_id)
                .map(|t| t.info_template_id)
                .collect();
            Ok(self
                .values
                .iter()
                .filter(|v| ids.contains(&v.info_template_id))
                .cloned()
                .collect())
        }

        fn subsheet_names(&self, _subsheet_ids: &[i64]) -> DbResult<HashMap<i64, String>> {
            Ok(self.names.clone())
        }
    }

    impl TranslationSource for MockSource {
        fn translations_available(&self) -> DbResult<bool> {
            Ok(true)
        }

        fn template_labels(&self, ids: &[i64], _lang: &str) -> DbResult<Vec<(i64, String)>> {
            Ok(self
                .translations
                .iter()
                .filter(|(id, _)| ids.contains(id))
                .cloned()
                .collect())
        }
    }

    fn template(id: i64, subsheet_id: i64, label: &str, uom: Option<&str>) -> FieldTemplateRow {
        FieldTemplateRow {
            info_template_id: id,
            subsheet_id,
            label: label.into(),
            uom: uom.map(str::to_string),
            group_key: None,
            cell_index: None,
            cell_caption: None,
        }
    }

    fn value(id: i64, value: &str, uom: Option<&str>, revision: i64) -> FieldValueCandidate {
        FieldValueCandidate {
            info_template_id: id,
            value: Some(value.into()),
            uom: uom.map(str::to_string),
            revision: Some(revision),
        }
    }

    fn request(layout_id: i64, uom: UnitSystem, lang: &str) -> RenderRequest {
        RenderRequest {
            layout_id,
            sheet_id: 100,
            uom,
            lang: lang.into(),
        }
    }

    fn body_slot(slot_index: i64, subsheet_id: i64, column_number: i64) -> BodySlot {
        BodySlot {
            slot_index,
            subsheet_id,
            column_number,
            row_number: 1,
            width: 1,
        }
    }

    fn place(conn: &Connection, layout_id: i64, subsheet_id: i64, left: &[i64], right: &[i64]) {
        let entries = |ids: &[i64]| {
            ids.iter()
                .enumerate()
                .map(|(i, id)| SlotEntry {
                    index: i as u32,
                    info_template_id: *id,
                })
                .collect::<Vec<_>>()
        };
        let payload = SubsheetSlotsPayload {
            merged: Some(false),
            left: Some(entries(left)),
            right: Some(entries(right)),
        };
        DbWriter::save_subsheet_slots(conn, layout_id, subsheet_id, &payload).unwrap();
    }

    #[test]
    fn test_empty_body_still_renders_header() {
        let conn = setup_layout_db();
        let layout_id = create_test_layout(&conn);
        let source = MockSource::default();
        let cache = TranslationCache::default();

        let payload = render_layout(&conn, &source, &cache, &request(layout_id, UnitSystem::USC, "en")).unwrap();
        assert!(payload.body.is_empty());
        assert_eq!(payload.header.equipment_tag_num.as_deref(), Some("P-101"));
        assert_eq!(payload.header.fields.len(), 1);
        let field = &payload.header.fields[0];
        assert_eq!(field.info_template_id, HEADER_TEMPLATE_ID);
        assert_eq!(field.value, "145.0377");
        assert_eq!(field.uom.as_deref(), Some("psi"));
        assert_eq!(field.raw_value.as_deref(), Some("1000"));
    }

    #[test]
    fn test_missing_sheet_is_not_found() {
        let conn = setup_layout_db();
        let layout_id = create_test_layout(&conn);
        let mut req = request(layout_id, UnitSystem::SI, "en");
        req.sheet_id = 999;
        let err = render_layout(&conn, &MockSource::default(), &TranslationCache::default(), &req).unwrap_err();
        assert!(matches!(err, DbError::SheetNotFound(999)));
    }

    #[test]
    fn test_orders_fields_and_drops_unplaced() {
        let conn = setup_layout_db();
        let layout_id = create_test_layout(&conn);
        DbWriter::save_layout_body_slots(&conn, layout_id, &[body_slot(1, 6, 2), body_slot(0, 5, 1)]).unwrap();
        place(&conn, layout_id, 5, &[42, 40], &[41]);
        place(&conn, layout_id, 6, &[60], &[]);

        let source = MockSource {
            templates: vec![
                template(40, 5, "Flow", Some("m3/h")),
                template(41, 5, "Temperature", Some("°C")),
                template(42, 5, "Pressure", Some("kPa")),
                template(43, 5, "Unplaced", None),
                template(60, 6, "Material", None),
            ],
            values: vec![
                value(42, "1000", None, 1),
                value(42, "2000", None, 2),
                value(41, "100", Some("degC"), 1),
                value(60, "SS316", None, 1),
            ],
            names: HashMap::from([(5, "Process Data".to_string()), (6, "123".to_string())]),
            ..Default::default()
        };
        let cache = TranslationCache::default();
        let payload = render_layout(&conn, &source, &cache, &request(layout_id, UnitSystem::USC, "en")).unwrap();

        assert_eq!(payload.body.len(), 2);
        let first = &payload.body[0];
        assert_eq!(first.subsheet_id, 5);
        assert_eq!(first.subsheet_name, "Process Data");
        let ids: Vec<i64> = first.fields.iter().map(|f| f.info_template_id).collect();
        assert_eq!(ids, vec![42, 40, 41]);

        assert_eq!(first.fields[0].raw_value.as_deref(), Some("2000"));
        assert_eq!(first.fields[0].value, "290.0755");
        assert_eq!(first.fields[1].value, "");
        assert_eq!(first.fields[1].uom.as_deref(), Some("gpm"));
        assert_eq!(first.fields[2].value, "212");
        assert_eq!(first.fields[2].uom.as_deref(), Some("°F"));
        assert_eq!(first.fields[2].raw_uom.as_deref(), Some("degC"));

        let second = &payload.body[1];
        assert_eq!(second.subsheet_name, "Subsheet 6");
        assert_eq!(second.column_number, 2);
        assert_eq!(second.fields[0].value, "SS316");
        assert_eq!(second.fields[0].uom, None);
        assert_eq!(source.value_queries.borrow().as_slice(), &[5, 6]);
    }

    #[test]
    fn test_labels_are_translated() {
        let conn = setup_layout_db();
        let layout_id = create_test_layout(&conn);
        DbWriter::save_layout_body_slots(&conn, layout_id, &[body_slot(0, 5, 1)]).unwrap();
        place(&conn, layout_id, 5, &[42, 43], &[]);

        let source = MockSource {
            templates: vec![template(42, 5, "Pressure", None), template(43, 5, "Speed", None)],
            translations: vec![(42, "Druck".into()), (0, "Kopf".into())],
            ..Default::default()
        };
        let cache = TranslationCache::default();
        let payload = render_layout(&conn, &source, &cache, &request(layout_id, UnitSystem::SI, "de")).unwrap();

        let labels: Vec<&str> = payload.body[0].fields.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["Druck", "Speed"]);
        assert_eq!(payload.header.fields[0].label, "Kopf");

        let english = render_layout(&conn, &source, &cache, &request(layout_id, UnitSystem::SI, "en")).unwrap();
        assert_eq!(english.body[0].fields[0].label, "Pressure");
    }

    #[test]
    fn test_failed_fetch_names_the_stage() {
        let conn = setup_layout_db();
        let layout_id = create_test_layout(&conn);
        DbWriter::save_layout_body_slots(&conn, layout_id, &[body_slot(0, 5, 1)]).unwrap();
        place(&conn, layout_id, 5, &[42], &[]);

        let source = MockSource {
            templates: vec![template(42, 5, "Pressure", None)],
            fail_values: true,
            ..Default::default()
        };
        let err = render_layout(&conn, &source, &TranslationCache::default(), &request(layout_id, UnitSystem::SI, "en"))
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Render {
                stage: RenderStage::FieldValues,
                ..
            }
        ));
        assert!(err.to_string().contains("field values"));
    }
}
