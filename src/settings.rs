use std::fs;
use std::path::{Path, PathBuf};

pub use game_types::Settings;
use tracing::{error, info};

use crate::storage_dir;

/// Reads and writes `settings.toml` in one directory.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    dir: PathBuf,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::in_dir(storage_dir())
    }
}

impl SettingsStore {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join("settings.toml")
    }

    /// Loads settings, falling back to defaults when the file is unreadable.
    /// Writes the defaults on first run.
    pub fn load(&self) -> Settings {
        let path = self.path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match toml::from_str::<Settings>(&content) {
                    Ok(s) => {
                        info!("Loaded settings from {:?}", path);
                        s
                    }
                    Err(e) => {
                        error!("Failed to parse settings.toml: {}", e);
                        Settings::default()
                    }
                },
                Err(e) => {
                    error!("Failed to read settings.toml: {}", e);
                    Settings::default()
                }
            }
        } else {
            info!("Creating default settings at {:?}", path);
            let default_settings = Settings::default();
            self.save(&default_settings);
            default_settings
        }
    }

    pub fn save(&self, settings: &Settings) {
        let path = self.path();
        match toml::to_string_pretty(settings) {
            Ok(content) => {
                if let Err(e) = fs::write(&path, content) {
                    error!("Failed to write settings.toml: {}", e);
                } else {
                    info!("Saved settings to {:?}", path);
                }
            }
            Err(e) => error!("Failed to serialize settings: {}", e),
        }
    }
}
