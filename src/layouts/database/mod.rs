// src/layouts/database/mod.rs

pub mod connection;
pub mod error;
pub mod reader;
pub mod schema;
pub mod validation;
pub mod writer;

pub use connection::DbConnection;
pub use error::{DbError, DbResult, RenderStage};
pub use reader::DbReader;
pub use writer::DbWriter;

use std::path::PathBuf;

pub const DATABASE_FILE: &str = "layouts.db";

/// Database storage configuration
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_path: PathBuf,
}

impl DbConfig {
    pub fn default_path() -> PathBuf {
        let documents = directories_next::UserDirs::new()
            .and_then(|dirs| dirs.document_dir().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));
        documents.join("DatasheetLayouts").join(DATABASE_FILE)
    }

    pub fn new() -> Self {
        Self {
            database_path: Self::default_path(),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: path.into(),
        }
    }

    pub fn ensure_directories(&self) -> std::io::Result<()> {
        if let Some(parent) = self.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::new()
    }
}
