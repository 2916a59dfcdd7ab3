//! Config struct definition.

use serde::{Deserialize, Serialize};

use super::types::{
    default_brightness_down_key, default_brightness_up_key, default_cycle_key,
    default_hotkey_modifiers, default_true,
};
use crate::hotkey::{HotkeyAction, HotkeyBinding, Key, Modifiers};

/// The persisted settings record. Field names follow the settings file
/// written by earlier releases, so old files keep loading.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Config {
    #[serde(default)]
    pub is_dark_mode: bool,
    #[serde(default = "default_true")]
    pub minimize_to_tray_on_close: bool,
    #[serde(default)]
    pub run_at_startup: bool,

    // --- Hotkeys: modifier names ("Control, Shift") and key names ---
    #[serde(default = "default_hotkey_modifiers")]
    pub hotkey_modifiers: String,
    #[serde(default = "default_cycle_key")]
    pub hotkey_key: String,
    #[serde(default = "default_hotkey_modifiers")]
    pub brightness_up_modifiers: String,
    #[serde(default = "default_brightness_up_key")]
    pub brightness_up_key: String,
    #[serde(default = "default_hotkey_modifiers")]
    pub brightness_down_modifiers: String,
    #[serde(default = "default_brightness_down_key")]
    pub brightness_down_key: String,

    #[serde(default = "default_true")]
    pub is_refresh_rate_hotkey_enabled: bool,
    /// Shared by the up and down slots.
    #[serde(default = "default_true")]
    pub is_brightness_hotkeys_enabled: bool,

    /// Comma-separated rates included in the cycle; empty means all.
    #[serde(default)]
    pub cycle_refresh_rates: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            is_dark_mode: false,
            minimize_to_tray_on_close: true,
            run_at_startup: false,
            hotkey_modifiers: default_hotkey_modifiers(),
            hotkey_key: default_cycle_key(),
            brightness_up_modifiers: default_hotkey_modifiers(),
            brightness_up_key: default_brightness_up_key(),
            brightness_down_modifiers: default_hotkey_modifiers(),
            brightness_down_key: default_brightness_down_key(),
            is_refresh_rate_hotkey_enabled: true,
            is_brightness_hotkeys_enabled: true,
            cycle_refresh_rates: String::new(),
        }
    }
}

impl Config {
    fn slot(&self, action: HotkeyAction) -> (&str, &str, Key) {
        match action {
            HotkeyAction::CycleRefreshRate => (&self.hotkey_modifiers, &self.hotkey_key, Key::R),
            HotkeyAction::BrightnessUp => {
                (&self.brightness_up_modifiers, &self.brightness_up_key, Key::Up)
            }
            HotkeyAction::BrightnessDown => (
                &self.brightness_down_modifiers,
                &self.brightness_down_key,
                Key::Down,
            ),
        }
    }

    fn slot_mut(&mut self, action: HotkeyAction) -> (&mut String, &mut String) {
        match action {
            HotkeyAction::CycleRefreshRate => (&mut self.hotkey_modifiers, &mut self.hotkey_key),
            HotkeyAction::BrightnessUp => {
                (&mut self.brightness_up_modifiers, &mut self.brightness_up_key)
            }
            HotkeyAction::BrightnessDown => (
                &mut self.brightness_down_modifiers,
                &mut self.brightness_down_key,
            ),
        }
    }

    /// The stored binding for a slot. An unreadable key name falls back to
    /// the slot's default key.
    pub fn binding(&self, action: HotkeyAction) -> HotkeyBinding {
        let (mods, key, default_key) = self.slot(action);
        let key = Key::from_name(key).unwrap_or(default_key);
        HotkeyBinding::new(action, Modifiers::from_setting_string(mods), key)
    }

    pub fn set_binding(&mut self, binding: &HotkeyBinding) {
        let (mods, key) = self.slot_mut(binding.action);
        *mods = binding.modifiers.to_setting_string();
        *key = binding.key.name().to_string();
    }

    pub fn is_hotkey_enabled(&self, action: HotkeyAction) -> bool {
        match action {
            HotkeyAction::CycleRefreshRate => self.is_refresh_rate_hotkey_enabled,
            HotkeyAction::BrightnessUp | HotkeyAction::BrightnessDown => {
                self.is_brightness_hotkeys_enabled
            }
        }
    }

    pub fn set_hotkey_enabled(&mut self, action: HotkeyAction, enabled: bool) {
        match action {
            HotkeyAction::CycleRefreshRate => self.is_refresh_rate_hotkey_enabled = enabled,
            HotkeyAction::BrightnessUp | HotkeyAction::BrightnessDown => {
                self.is_brightness_hotkeys_enabled = enabled
            }
        }
    }

    /// Rates included in the cycle. Entries that are not positive integers
    /// are dropped.
    pub fn cycle_rates(&self) -> Vec<u32> {
        self.cycle_refresh_rates
            .split(',')
            .filter_map(|s| s.trim().parse::<u32>().ok())
            .filter(|&r| r > 0)
            .collect()
    }

    pub fn set_cycle_rates(&mut self, rates: impl IntoIterator<Item = u32>) {
        self.cycle_refresh_rates = rates
            .into_iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(",");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_first_run() {
        let config = Config::default();
        let cycle = config.binding(HotkeyAction::CycleRefreshRate);
        assert_eq!(cycle.to_string(), "Ctrl + Shift + R");
        assert_eq!(config.binding(HotkeyAction::BrightnessUp).key, Key::Up);
        assert_eq!(config.binding(HotkeyAction::BrightnessDown).key, Key::Down);
        assert!(config.is_hotkey_enabled(HotkeyAction::CycleRefreshRate));
        assert!(config.minimize_to_tray_on_close);
        assert!(config.cycle_rates().is_empty());
    }

    #[test]
    fn binding_strings_round_trip() {
        let mut config = Config::default();
        let binding = HotkeyBinding::new(
            HotkeyAction::BrightnessUp,
            Modifiers::WIN | Modifiers::ALT,
            Key::OemPlus,
        );
        config.set_binding(&binding);
        assert_eq!(config.brightness_up_modifiers, "Alt, Windows");
        assert_eq!(config.brightness_up_key, "OemPlus");
        assert_eq!(config.binding(HotkeyAction::BrightnessUp), binding);
    }

    #[test]
    fn unreadable_key_falls_back_to_slot_default() {
        let config = Config {
            brightness_down_key: "Bogus".into(),
            ..Config::default()
        };
        assert_eq!(config.binding(HotkeyAction::BrightnessDown).key, Key::Down);
    }

    #[test]
    fn brightness_slots_share_one_flag() {
        let mut config = Config::default();
        config.set_hotkey_enabled(HotkeyAction::BrightnessDown, false);
        assert!(!config.is_hotkey_enabled(HotkeyAction::BrightnessUp));
        assert!(config.is_hotkey_enabled(HotkeyAction::CycleRefreshRate));
    }

    #[test]
    fn cycle_rate_list_drops_junk() {
        let mut config = Config {
            cycle_refresh_rates: "60, 0,abc,,144,-5".into(),
            ..Config::default()
        };
        assert_eq!(config.cycle_rates(), vec![60, 144]);
        config.set_cycle_rates([48, 165]);
        assert_eq!(config.cycle_refresh_rates, "48,165");
    }
}
