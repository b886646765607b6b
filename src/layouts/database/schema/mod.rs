// src/layouts/database/schema/mod.rs

pub mod datasheet_tables;
pub mod migrations;
pub mod queries;
pub mod table_creation;

pub use datasheet_tables::ensure_datasheet_tables;
pub use table_creation::ensure_layout_schema;
