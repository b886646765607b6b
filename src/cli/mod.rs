// src/cli/mod.rs
// Operator commands for layout maintenance and rendering

pub mod layouts;
pub mod render;
pub mod slots;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::layouts::database::{DbError, DbResult};
use crate::layouts::uom::UnitSystem;
use crate::settings::AppSettings;

#[derive(Parser)]
#[command(name = "datasheet-layout")]
#[command(about = "Datasheet layout definitions and rendering", long_about = None)]
pub struct Cli {
    /// Path to the layout database (overrides DATASHEET_LAYOUT_DB and settings)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the layout schema
    Init {
        /// Also create the reference datasheet tables
        #[arg(long)]
        with_datasheets: bool,
    },

    /// Create a layout seeded with header, body and footer regions
    CreateLayout {
        #[arg(long)]
        template: Option<i64>,
        #[arg(long)]
        client: Option<i64>,
        /// A4, A3, Letter, Legal or Tabloid
        #[arg(long, default_value = "A4")]
        paper: String,
        /// portrait or landscape
        #[arg(long, default_value = "portrait")]
        orientation: String,
        #[arg(long, default_value_t = 12)]
        grid_cols: u32,
        #[arg(long)]
        default: bool,
    },

    /// List layouts, optionally filtered by template or client
    ListLayouts {
        #[arg(long)]
        template: Option<i64>,
        #[arg(long)]
        client: Option<i64>,
    },

    /// Print a layout with its regions and blocks as JSON
    ShowLayout { layout_id: i64 },

    /// Delete a layout together with its regions, blocks and slots
    DeleteLayout { layout_id: i64 },

    /// Print the body slots of a layout
    BodySlots { layout_id: i64 },

    /// Replace the body slots of a layout from a JSON array file
    SaveBodySlots { layout_id: i64, file: PathBuf },

    /// Print the field slots of one subsheet
    SubsheetSlots { layout_id: i64, subsheet_id: i64 },

    /// Replace the field slots of one subsheet from a JSON file
    SaveSubsheetSlots {
        layout_id: i64,
        subsheet_id: i64,
        file: PathBuf,
    },

    /// Render a sheet through a layout and print the payload
    Render {
        layout_id: i64,
        sheet_id: i64,
        /// SI or USC; defaults to the configured unit system
        #[arg(long)]
        uom: Option<UnitSystem>,
        /// Label language; defaults to the configured language
        #[arg(long)]
        lang: Option<String>,
    },
}

pub fn run(cli: Cli, settings: &AppSettings) -> DbResult<()> {
    let config = settings.resolve_db_config(cli.db);

    match cli.command {
        Commands::Init { with_datasheets } => layouts::init(&config, with_datasheets),
        Commands::CreateLayout {
            template,
            client,
            paper,
            orientation,
            grid_cols,
            default,
        } => layouts::create(&config, template, client, &paper, &orientation, grid_cols, default),
        Commands::ListLayouts { template, client } => layouts::list(&config, template, client),
        Commands::ShowLayout { layout_id } => layouts::show(&config, layout_id),
        Commands::DeleteLayout { layout_id } => layouts::delete(&config, layout_id),
        Commands::BodySlots { layout_id } => slots::show_body(&config, layout_id),
        Commands::SaveBodySlots { layout_id, file } => slots::save_body(&config, layout_id, &file),
        Commands::SubsheetSlots { layout_id, subsheet_id } => {
            slots::show_subsheet(&config, layout_id, subsheet_id)
        }
        Commands::SaveSubsheetSlots {
            layout_id,
            subsheet_id,
            file,
        } => slots::save_subsheet(&config, layout_id, subsheet_id, &file),
        Commands::Render {
            layout_id,
            sheet_id,
            uom,
            lang,
        } => render::run(
            &config,
            layout_id,
            sheet_id,
            uom.unwrap_or(settings.default_uom),
            lang.unwrap_or_else(|| settings.default_language.clone()),
            &settings.default_language,
        ),
    }
}

/// Process exit status for a failed command: 2 when the requested layout,
/// region, block or sheet does not exist, 1 otherwise.
pub fn exit_code(error: &DbError) -> i32 {
    if error.is_not_found() {
        2
    } else {
        1
    }
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> DbResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_render_flags() {
        let cli = Cli::try_parse_from(["datasheet-layout", "--db", "x.db", "render", "3", "100", "--uom", "usc"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("x.db")));
        match cli.command {
            Commands::Render { layout_id, sheet_id, uom, lang } => {
                assert_eq!((layout_id, sheet_id), (3, 100));
                assert_eq!(uom, Some(UnitSystem::USC));
                assert!(lang.is_none());
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn test_rejects_unknown_unit_system() {
        assert!(Cli::try_parse_from(["datasheet-layout", "render", "1", "1", "--uom", "cgs"]).is_err());
    }

    #[test]
    fn test_not_found_exits_with_two() {
        assert_eq!(exit_code(&DbError::LayoutNotFound(7)), 2);
        assert_eq!(exit_code(&DbError::SheetNotFound(100)), 2);
        assert_eq!(exit_code(&DbError::validation("duplicate slotIndex 0")), 1);
    }
}
