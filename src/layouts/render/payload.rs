// src/layouts/render/payload.rs
// Render output handed to the export/view layer

use serde::{Deserialize, Serialize};

use crate::layouts::uom::UnitSystem;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub layout_id: i64,
    pub sheet_id: i64,
    pub uom: UnitSystem,
    pub lang: String,
}

/// One field ready to draw. `raw_value`/`raw_uom` keep the stored data so
/// consumers can audit the conversion behind `value`/`uom`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderField {
    pub info_template_id: i64,
    pub label: String,
    pub raw_value: Option<String>,
    pub raw_uom: Option<String>,
    pub value: String,
    pub uom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_caption: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderHeader {
    pub equipment_tag_num: Option<String>,
    pub equipment_name: Option<String>,
    pub project: Option<String>,
    pub fields: Vec<RenderField>,
}

/// A placed subsheet with its ordered fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSubsheet {
    pub subsheet_id: i64,
    pub subsheet_name: String,
    pub slot_index: i64,
    pub column_number: i64,
    pub row_number: i64,
    pub width: i64,
    pub fields: Vec<RenderField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPayload {
    pub layout_id: i64,
    pub sheet_id: i64,
    pub uom: UnitSystem,
    pub lang: String,
    pub header: RenderHeader,
    pub body: Vec<RenderSubsheet>,
}

impl RenderPayload {
    pub fn field_count(&self) -> usize {
        self.body.iter().map(|b| b.fields.len()).sum()
    }
}
