//! Persisted user settings
//!
//! Currently a single light/dark preference, stored as its own small JSON
//! blob next to the history file.

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::storage;

/// File name under the data directory
pub const SETTINGS_FILE: &str = "eggy_settings.json";

/// Light/dark preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    fn toggled(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Settings {
    theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self { theme: Theme::Light }
    }
}

/// JSON-file-backed settings store
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Mutex<Settings>,
}

impl SettingsStore {
    /// Open (or start) the settings stored under `dir`
    pub fn new(dir: &Path) -> Self {
        let path = dir.join(SETTINGS_FILE);
        let settings: Settings = storage::read_json(&path, Settings::default());
        info!("Theme preference: {}", settings.theme.as_str());
        Self {
            path,
            settings: Mutex::new(settings),
        }
    }

    /// Current theme preference
    pub fn theme(&self) -> Theme {
        match self.settings.lock() {
            Ok(settings) => settings.theme,
            Err(e) => {
                error!("Failed to lock settings: {}", e);
                Theme::Light
            }
        }
    }

    /// Flip between light and dark, persist, and return the new theme
    pub fn toggle_theme(&self) -> Theme {
        match self.settings.lock() {
            Ok(mut settings) => {
                settings.theme = settings.theme.toggled();
                storage::write_json(&self.path, &*settings);
                settings.theme
            }
            Err(e) => {
                error!("Failed to lock settings: {}", e);
                Theme::Light
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_light() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path());
        assert_eq!(store.theme(), Theme::Light);
    }

    #[test]
    fn toggle_flips_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = SettingsStore::new(dir.path());
            assert_eq!(store.toggle_theme(), Theme::Dark);
            assert_eq!(store.theme(), Theme::Dark);
        }

        let reloaded = SettingsStore::new(dir.path());
        assert_eq!(reloaded.theme(), Theme::Dark);
        assert_eq!(reloaded.toggle_theme(), Theme::Light);
    }

    #[test]
    fn corrupt_settings_file_degrades_to_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "\"???\"").unwrap();

        let store = SettingsStore::new(dir.path());
        assert_eq!(store.theme(), Theme::Light);
    }
}
