// src/main.rs

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use datasheet_layout::cli::{self, Cli};
use datasheet_layout::settings::{io::load_settings_from_file, AppSettings};

fn main() {
    // .env is optional
    let _ = dotenvy::dotenv();

    let settings = match load_settings_from_file::<AppSettings>() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load settings, using defaults: {}", e);
            AppSettings::default()
        }
    };
    init_logging(&settings);

    let cli = Cli::parse();
    if let Err(e) = cli::run(cli, &settings) {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(cli::exit_code(&e));
    }
}

fn init_logging(settings: &AppSettings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}
