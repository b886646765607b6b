// src/layouts/source/mod.rs
// Lookups the render pipeline needs from the datasheet side. The layout
// core only reads through these traits; it never owns sheet data.

mod sqlite;

pub use sqlite::SqliteSheetSource;

use std::collections::HashMap;

use super::database::error::DbResult;

/// Equipment identification of one sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetHeaderRow {
    pub sheet_id: i64,
    pub equipment_tag_num: Option<String>,
    pub equipment_name: Option<String>,
    pub project_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderFieldRow {
    pub label: String,
    pub value: Option<String>,
    pub uom: Option<String>,
    pub sort_order: i64,
}

/// A field template with its optional multi-cell grouping (for example the
/// min/normal/max cells of one quantity).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTemplateRow {
    pub info_template_id: i64,
    pub subsheet_id: i64,
    pub label: String,
    pub uom: Option<String>,
    pub group_key: Option<String>,
    pub cell_index: Option<i64>,
    pub cell_caption: Option<String>,
}

/// One stored value for a field. A field can have several across revisions
/// and parties; see `render::ordering::select_latest_values`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValueCandidate {
    pub info_template_id: i64,
    pub value: Option<String>,
    pub uom: Option<String>,
    pub revision: Option<i64>,
}

impl FieldValueCandidate {
    pub fn has_value(&self) -> bool {
        self.value.as_deref().is_some_and(|v| !v.trim().is_empty())
    }
}

pub trait SheetDataSource {
    fn sheet_header(&self, sheet_id: i64) -> DbResult<Option<SheetHeaderRow>>;

    /// Header key-values ordered by their stored sort order.
    fn header_fields(&self, sheet_id: i64) -> DbResult<Vec<HeaderFieldRow>>;

    fn field_templates(&self, subsheet_ids: &[i64]) -> DbResult<Vec<FieldTemplateRow>>;

    /// Every stored value of the subsheet's fields on this sheet.
    fn field_values(&self, sheet_id: i64, subsheet_id: i64) -> DbResult<Vec<FieldValueCandidate>>;

    fn subsheet_names(&self, subsheet_ids: &[i64]) -> DbResult<HashMap<i64, String>>;
}

pub trait TranslationSource {
    /// Whether translations are stored at all.
    fn translations_available(&self) -> DbResult<bool>;

    fn template_labels(&self, info_template_ids: &[i64], lang: &str) -> DbResult<Vec<(i64, String)>>;
}
