// src/layouts/definitions.rs
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::database::error::{DbError, DbResult};

/// Lower-case text enums stored as TEXT columns.
macro_rules! text_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DbError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    other => Err(DbError::InvalidStoredValue(format!(
                        "unknown {} '{}'",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                let text = value.as_str()?;
                text.parse().map_err(|e: DbError| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    #[default]
    A4,
    A3,
    Letter,
    Legal,
    Tabloid,
}

text_enum!(PaperSize {
    A4 => "a4",
    A3 => "a3",
    Letter => "letter",
    Legal => "legal",
    Tabloid => "tabloid",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

text_enum!(Orientation {
    Portrait => "portrait",
    Landscape => "landscape",
});

/// Locked regions carry fixed content; dynamic regions host blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    Locked,
    Dynamic,
}

text_enum!(RegionKind {
    Locked => "locked",
    Dynamic => "dynamic",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Text,
    Field,
    Image,
    Divider,
}

text_enum!(BlockType {
    Text => "text",
    Field => "field",
    Image => "image",
    Divider => "divider",
});

/// Position and size in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GridRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl GridRect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    fn validate(&self, what: &str) -> DbResult<()> {
        if self.w == 0 || self.h == 0 {
            return Err(DbError::validation(format!(
                "{} must have a non-zero width and height",
                what
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Margins {
    pub top_mm: f64,
    pub right_mm: f64,
    pub bottom_mm: f64,
    pub left_mm: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top_mm: 10.0,
            right_mm: 10.0,
            bottom_mm: 10.0,
            left_mm: 10.0,
        }
    }
}

impl Margins {
    fn validate(&self) -> DbResult<()> {
        for (side, value) in [
            ("top", self.top_mm),
            ("right", self.right_mm),
            ("bottom", self.bottom_mm),
            ("left", self.left_mm),
        ] {
            check_non_negative(&format!("{} margin", side), value)?;
        }
        Ok(())
    }
}

/// Pointer from a block to the external data it shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SourceRef {
    #[serde(rename_all = "camelCase")]
    Field { info_template_id: i64 },
    #[serde(rename_all = "camelCase")]
    Template { template_id: i64 },
    #[serde(rename_all = "camelCase")]
    Header { field_label: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutMeta {
    pub layout_id: i64,
    pub template_id: Option<i64>,
    pub client_id: Option<i64>,
    pub paper_size: PaperSize,
    pub orientation: Orientation,
    pub grid_cols: u32,
    pub grid_gap_mm: f64,
    pub margins: Margins,
    pub theme: Option<serde_json::Value>,
    pub locked_header: Option<serde_json::Value>,
    pub locked_footer: Option<serde_json::Value>,
    pub version: i64,
    pub is_default: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub region_id: i64,
    pub layout_id: i64,
    pub kind: RegionKind,
    pub name: String,
    #[serde(flatten)]
    pub rect: GridRect,
    pub order_index: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub block_id: i64,
    pub region_id: i64,
    pub block_type: BlockType,
    pub source_ref: Option<SourceRef>,
    pub props: Option<serde_json::Value>,
    #[serde(flatten)]
    pub rect: GridRect,
    pub order_index: i64,
}

/// Full layout structure as returned by `get_layout_bundle`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutBundle {
    pub meta: LayoutMeta,
    pub regions: Vec<Region>,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutFilter {
    pub template_id: Option<i64>,
    pub client_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct NewLayout {
    pub template_id: Option<i64>,
    pub client_id: Option<i64>,
    pub paper_size: PaperSize,
    pub orientation: Orientation,
    pub grid_cols: u32,
    pub grid_gap_mm: f64,
    pub margins: Margins,
    pub theme: Option<serde_json::Value>,
    pub locked_header: Option<serde_json::Value>,
    pub locked_footer: Option<serde_json::Value>,
    pub is_default: bool,
}

impl Default for NewLayout {
    fn default() -> Self {
        Self {
            template_id: None,
            client_id: None,
            paper_size: PaperSize::default(),
            orientation: Orientation::default(),
            grid_cols: 12,
            grid_gap_mm: 4.0,
            margins: Margins::default(),
            theme: None,
            locked_header: None,
            locked_footer: None,
            is_default: false,
        }
    }
}

impl NewLayout {
    pub fn validate(&self) -> DbResult<()> {
        check_grid_cols(self.grid_cols)?;
        check_non_negative("grid gap", self.grid_gap_mm)?;
        self.margins.validate()
    }

    /// Header, body and footer regions every new layout starts with.
    pub fn default_regions(&self) -> [NewRegion; 3] {
        let cols = self.grid_cols;
        [
            NewRegion {
                kind: RegionKind::Locked,
                name: "header".to_string(),
                rect: GridRect::new(0, 0, cols, 2),
                order_index: 0,
            },
            NewRegion {
                kind: RegionKind::Dynamic,
                name: "body".to_string(),
                rect: GridRect::new(0, 2, cols, 20),
                order_index: 1,
            },
            NewRegion {
                kind: RegionKind::Locked,
                name: "footer".to_string(),
                rect: GridRect::new(0, 22, cols, 2),
                order_index: 2,
            },
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRegion {
    pub kind: RegionKind,
    pub name: String,
    #[serde(flatten)]
    pub rect: GridRect,
    #[serde(default)]
    pub order_index: i64,
}

impl NewRegion {
    pub fn validate(&self) -> DbResult<()> {
        if self.name.trim().is_empty() {
            return Err(DbError::validation("region name must not be empty"));
        }
        self.rect.validate("region")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBlock {
    pub block_type: BlockType,
    #[serde(default)]
    pub source_ref: Option<SourceRef>,
    #[serde(default)]
    pub props: Option<serde_json::Value>,
    #[serde(flatten)]
    pub rect: GridRect,
    #[serde(default)]
    pub order_index: i64,
}

impl NewBlock {
    pub fn validate(&self) -> DbResult<()> {
        if self.block_type == BlockType::Field && self.source_ref.is_none() {
            return Err(DbError::validation("field blocks need a sourceRef"));
        }
        self.rect.validate("block")
    }
}

/// Partial metadata update. `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct LayoutMetaPatch {
    #[serde(deserialize_with = "deserialize_some")]
    pub template_id: Option<Option<i64>>,
    #[serde(deserialize_with = "deserialize_some")]
    pub client_id: Option<Option<i64>>,
    pub paper_size: Option<PaperSize>,
    pub orientation: Option<Orientation>,
    pub grid_cols: Option<u32>,
    pub grid_gap_mm: Option<f64>,
    pub margins: Option<Margins>,
    #[serde(deserialize_with = "deserialize_some")]
    pub theme: Option<Option<serde_json::Value>>,
    #[serde(deserialize_with = "deserialize_some")]
    pub locked_header: Option<Option<serde_json::Value>>,
    #[serde(deserialize_with = "deserialize_some")]
    pub locked_footer: Option<Option<serde_json::Value>>,
    pub is_default: Option<bool>,
}

impl LayoutMetaPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> DbResult<()> {
        if self.is_empty() {
            return Err(DbError::validation("layout meta update has no fields"));
        }
        if let Some(cols) = self.grid_cols {
            check_grid_cols(cols)?;
        }
        if let Some(gap) = self.grid_gap_mm {
            check_non_negative("grid gap", gap)?;
        }
        if let Some(margins) = &self.margins {
            margins.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct RegionPatch {
    pub kind: Option<RegionKind>,
    pub name: Option<String>,
    pub x: Option<u32>,
    pub y: Option<u32>,
    pub w: Option<u32>,
    pub h: Option<u32>,
    pub order_index: Option<i64>,
}

impl RegionPatch {
    pub fn validate(&self) -> DbResult<()> {
        if *self == Self::default() {
            return Err(DbError::validation("region update has no fields"));
        }
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(DbError::validation("region name must not be empty"));
        }
        if self.w == Some(0) || self.h == Some(0) {
            return Err(DbError::validation(
                "region must have a non-zero width and height",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct BlockPatch {
    pub block_type: Option<BlockType>,
    #[serde(deserialize_with = "deserialize_some")]
    pub source_ref: Option<Option<SourceRef>>,
    #[serde(deserialize_with = "deserialize_some")]
    pub props: Option<Option<serde_json::Value>>,
    pub x: Option<u32>,
    pub y: Option<u32>,
    pub w: Option<u32>,
    pub h: Option<u32>,
    pub order_index: Option<i64>,
}

impl BlockPatch {
    pub fn validate(&self) -> DbResult<()> {
        if *self == Self::default() {
            return Err(DbError::validation("block update has no fields"));
        }
        if self.w == Some(0) || self.h == Some(0) {
            return Err(DbError::validation(
                "block must have a non-zero width and height",
            ));
        }
        Ok(())
    }
}

/// Distinguishes an absent key from an explicit `null`.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn check_grid_cols(cols: u32) -> DbResult<()> {
    if !(1..=48).contains(&cols) {
        return Err(DbError::validation(format!(
            "grid column count must be between 1 and 48, got {}",
            cols
        )));
    }
    Ok(())
}

fn check_non_negative(what: &str, value: f64) -> DbResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(DbError::validation(format!(
            "{} must be a finite, non-negative number",
            what
        )));
    }
    Ok(())
}
