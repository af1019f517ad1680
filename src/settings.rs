//! # Game Settings
//!
//! User-tunable settings, stored as one JSON file next to the save
//! directory. Reads are forgiving: a missing file is written out with
//! defaults, an unreadable one is logged and replaced by defaults in
//! memory without touching the file.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::SaveError;

/// Default file name for the settings record.
pub const SETTINGS_FILE: &str = "settings.json";

/// Runtime configuration, deserialized from `settings.json`.
///
/// Missing fields fall back to their defaults so old files keep working
/// after new settings are added.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Version of the build that wrote the file.
    pub version: String,
    /// View radius in chunks around the observer.
    pub view_distance: i32,
    /// Whether chunk generation and meshing run on a worker thread.
    pub enable_threading: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            view_distance: 5,
            enable_threading: true,
        }
    }
}

impl GameSettings {
    /// Reads settings from `path`, creating the file when absent.
    pub fn load_or_create(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(settings) => settings,
                Err(error) => {
                    log::error!(
                        "Unreadable settings at {}: {error}; using defaults",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                let settings = Self::default();
                match settings.save(path) {
                    Ok(()) => log::info!("Wrote default settings to {}", path.display()),
                    Err(error) => log::error!("Failed to write default settings: {error}"),
                }
                settings
            }
            Err(error) => {
                log::error!(
                    "Failed to read settings at {}: {error}; using defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Writes the settings to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), SaveError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "voxel-settings-{label}-{}-{}",
            std::process::id(),
            fastrand::u64(..)
        ))
    }

    #[test]
    fn missing_files_are_created_with_defaults() {
        let path = temp_path("create").join(SETTINGS_FILE);

        let settings = GameSettings::load_or_create(&path);
        assert_eq!(settings.view_distance, 5);
        assert!(settings.enable_threading);
        assert!(path.exists());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn saved_settings_round_trip() {
        let path = temp_path("roundtrip").join(SETTINGS_FILE);

        let mut settings = GameSettings::default();
        settings.view_distance = 9;
        settings.enable_threading = false;
        settings.save(&path).unwrap();

        let loaded = GameSettings::load_or_create(&path);
        assert_eq!(loaded.view_distance, 9);
        assert!(!loaded.enable_threading);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn garbage_files_fall_back_to_defaults() {
        let dir = temp_path("garbage");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(SETTINGS_FILE);
        fs::write(&path, "{ this is not json").unwrap();

        let settings = GameSettings::load_or_create(&path);
        assert_eq!(settings.view_distance, 5);

        // The broken file is left in place for the user to inspect.
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ this is not json");

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn partial_files_fill_missing_fields() {
        let dir = temp_path("partial");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(SETTINGS_FILE);
        fs::write(&path, r#"{ "view_distance": 2 }"#).unwrap();

        let settings = GameSettings::load_or_create(&path);
        assert_eq!(settings.view_distance, 2);
        assert!(settings.enable_threading);

        let _ = fs::remove_dir_all(dir);
    }
}
