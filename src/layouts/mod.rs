// src/layouts/mod.rs

pub mod database;
pub mod definitions;
pub mod render;
pub mod slots;
pub mod source;
pub mod translation;
pub mod uom;

pub use database::{DbConnection, DbError, DbReader, DbResult, DbWriter};
pub use render::{render_layout, RenderPayload, RenderRequest};
pub use translation::TranslationCache;
