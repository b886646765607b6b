use directories_next::ProjectDirs;
use std::fs;
use std::io::{self, BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "DatasheetLayouts";
const APPLICATION: &str = "DatasheetLayout";
const CONFIG_FILE: &str = "app_settings.json";

pub fn get_config_path() -> io::Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION) {
        let config_dir = proj_dirs.config_dir();
        fs::create_dir_all(config_dir)?;
        Ok(config_dir.join(CONFIG_FILE))
    } else {
        Err(io::Error::new(ErrorKind::NotFound, "Could not determine project directories for app settings."))
    }
}

pub fn load_settings_from_file<T: for<'de> serde::de::Deserialize<'de> + Default>() -> io::Result<T> {
    load_settings_from(&get_config_path()?)
}

pub fn save_settings_to_file<T: serde::Serialize>(settings: &T) -> io::Result<()> {
    save_settings_to(&get_config_path()?, settings)
}

/// Missing file → defaults; unreadable JSON is an error.
pub fn load_settings_from<T: for<'de> serde::de::Deserialize<'de> + Default>(config_file: &Path) -> io::Result<T> {
    debug!("AppSettings: Attempting to load settings from {:?}", config_file);
    match fs::File::open(config_file) {
        Ok(file) => {
            let reader = BufReader::new(file);
            match serde_json::from_reader(reader) {
                Ok(settings) => {
                    debug!("AppSettings: Successfully deserialized settings.");
                    Ok(settings)
                }
                Err(e) => {
                    error!("AppSettings: Failed to parse settings file {:?}: {}", config_file, e);
                    Err(io::Error::new(ErrorKind::InvalidData, format!("Failed to parse settings file: {}", e)))
                }
            }
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("AppSettings: Settings file not found at {:?}. Returning default.", config_file);
            Ok(Default::default())
        }
        Err(e) => {
            error!("AppSettings: Failed to open settings file {:?}: {}", config_file, e);
            Err(e)
        }
    }
}

pub fn save_settings_to<T: serde::Serialize>(config_file: &Path, settings: &T) -> io::Result<()> {
    info!("AppSettings: Saving settings to {:?}", config_file);
    if let Some(parent) = config_file.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(config_file)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, settings).map_err(|e| {
        error!("AppSettings: Failed to serialize settings to {:?}: {}", config_file, e);
        io::Error::new(ErrorKind::Other, e)
    })?;
    Ok(())
}
