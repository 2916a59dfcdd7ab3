//! Config I/O: the settings file under the per-user data directory.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use super::config_struct::Config;

const APP_DIR: &str = "LapKeys";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Where settings live. Loading never fails: anything unreadable yields
/// defaults.
pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, config: &Config) -> Result<(), ConfigError>;
}

impl<S: ConfigStore + ?Sized> ConfigStore for Box<S> {
    fn load(&self) -> Config {
        (**self).load()
    }

    fn save(&self, config: &Config) -> Result<(), ConfigError> {
        (**self).save(config)
    }
}

/// `%LOCALAPPDATA%\LapKeys`, falling back to the working directory.
pub fn get_config_dir() -> PathBuf {
    dirs::data_local_dir().unwrap_or_default().join(APP_DIR)
}

pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn at_default_location() -> Self {
        Self::new(get_config_dir().join(SETTINGS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for JsonConfigStore {
    fn load(&self) -> Config {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "no settings file, using defaults");
                return Config::default();
            }
        };
        match serde_json::from_str(&data) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "settings file unreadable, using defaults");
                Config::default()
            }
        }
    }

    fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(io_err)?;
        }
        let data = serde_json::to_string_pretty(config)?;
        std::fs::write(&self.path, data).map_err(io_err)?;
        debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let store = JsonConfigStore::new(dir.path().join("settings.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn saved_settings_load_back() {
        let dir = TempDir::new().unwrap();
        let store = JsonConfigStore::new(dir.path().join("LapKeys").join("settings.json"));
        let mut config = Config {
            is_dark_mode: true,
            minimize_to_tray_on_close: false,
            run_at_startup: true,
            hotkey_modifiers: "Alt".into(),
            hotkey_key: "F5".into(),
            brightness_up_modifiers: "Control, Windows".into(),
            brightness_up_key: "PageUp".into(),
            brightness_down_modifiers: "Alt, Shift".into(),
            brightness_down_key: "PageDown".into(),
            is_refresh_rate_hotkey_enabled: false,
            is_brightness_hotkeys_enabled: false,
            ..Config::default()
        };
        config.set_cycle_rates([144, 60]);
        store.save(&config).unwrap();

        let loaded = store.load();
        assert_eq!(loaded, config);
        let mut rates = loaded.cycle_rates();
        rates.sort_unstable();
        assert_eq!(rates, vec![60, 144]);

        let text = std::fs::read_to_string(store.path()).unwrap();
        for field in [
            "\"IsRefreshRateHotkeyEnabled\": false",
            "\"IsBrightnessHotkeysEnabled\": false",
            "\"BrightnessUpModifiers\": \"Control, Windows\"",
            "\"BrightnessUpKey\": \"PageUp\"",
            "\"BrightnessDownModifiers\": \"Alt, Shift\"",
            "\"BrightnessDownKey\": \"PageDown\"",
            "\"CycleRefreshRates\": \"144,60\"",
        ] {
            assert!(text.contains(field), "missing {field} in {text}");
        }
    }

    #[test]
    fn keys_are_pascal_case() {
        let dir = TempDir::new().unwrap();
        let store = JsonConfigStore::new(dir.path().join("settings.json"));
        store.save(&Config::default()).unwrap();
        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\"MinimizeToTrayOnClose\": true"));
        assert!(text.contains("\"BrightnessUpKey\": \"Up\""));
        assert!(text.contains("\"IsBrightnessHotkeysEnabled\""));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "IsDarkMode": true, "HotkeyKey": "F9" }"#).unwrap();
        let config = JsonConfigStore::new(&path).load();
        assert!(config.is_dark_mode);
        assert_eq!(config.hotkey_key, "F9");
        assert_eq!(config.hotkey_modifiers, "Control, Shift");
        assert!(config.minimize_to_tray_on_close);
    }

    #[test]
    fn corrupt_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(JsonConfigStore::new(&path).load(), Config::default());
    }
}
