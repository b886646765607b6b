// src/layouts/database/error.rs

use std::fmt;
use thiserror::Error;

/// Which fetch of the render pipeline failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
    SheetHeader,
    HeaderFields,
    BodySlots,
    Templates,
    SubsheetSlots,
    FieldValues,
    TranslationPriming,
    SubsheetNames,
}

impl fmt::Display for RenderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderStage::SheetHeader => "sheet header",
            RenderStage::HeaderFields => "header fields",
            RenderStage::BodySlots => "body slots",
            RenderStage::Templates => "field templates",
            RenderStage::SubsheetSlots => "subsheet slots",
            RenderStage::FieldValues => "field values",
            RenderStage::TranslationPriming => "translation priming",
            RenderStage::SubsheetNames => "subsheet names",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("Layout not found: {0}")]
    LayoutNotFound(i64),
    #[error("Region {region_id} not found in layout {layout_id}")]
    RegionNotFound { layout_id: i64, region_id: i64 },
    #[error("Block {block_id} not found in layout {layout_id}")]
    BlockNotFound { layout_id: i64, block_id: i64 },
    #[error("Sheet not found: {0}")]
    SheetNotFound(i64),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Invalid stored value: {0}")]
    InvalidStoredValue(String),
    #[error("Render failed while loading {stage}: {source}")]
    Render {
        stage: RenderStage,
        #[source]
        source: Box<DbError>,
    },
    #[error("{0}")]
    Other(String),
}

pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DbError::Validation(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DbError::LayoutNotFound(_)
                | DbError::RegionNotFound { .. }
                | DbError::BlockNotFound { .. }
                | DbError::SheetNotFound(_)
        )
    }
}

/// Attaches the failing render stage to a storage error.
pub trait RenderContext<T> {
    fn at_stage(self, stage: RenderStage) -> DbResult<T>;
}

impl<T> RenderContext<T> for DbResult<T> {
    fn at_stage(self, stage: RenderStage) -> DbResult<T> {
        self.map_err(|e| DbError::Render {
            stage,
            source: Box::new(e),
        })
    }
}
