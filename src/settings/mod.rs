// src/settings/mod.rs
pub mod io;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::layouts::database::DbConfig;
use crate::layouts::translation::DEFAULT_LANGUAGE;
use crate::layouts::uom::UnitSystem;

/// Environment variable that overrides the stored database path.
pub const DATABASE_ENV_VAR: &str = "DATASHEET_LAYOUT_DB";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub database_path: Option<PathBuf>,
    pub default_language: String,
    pub log_level: String,
    pub default_uom: UnitSystem,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            database_path: None,
            default_language: DEFAULT_LANGUAGE.to_string(),
            log_level: "info".to_string(),
            default_uom: UnitSystem::SI,
        }
    }
}

impl AppSettings {
    /// Database location: explicit override, then `DATASHEET_LAYOUT_DB`,
    /// then the stored path, then the platform default.
    pub fn resolve_db_config(&self, cli_override: Option<PathBuf>) -> DbConfig {
        let env_path = std::env::var_os(DATABASE_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        match cli_override.or(env_path).or_else(|| self.database_path.clone()) {
            Some(path) => DbConfig::with_path(path),
            None => DbConfig::new(),
        }
    }
}
