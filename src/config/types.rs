//! Serde default helpers for the settings record.

pub fn default_true() -> bool {
    true
}

pub fn default_hotkey_modifiers() -> String {
    "Control, Shift".to_string()
}

pub fn default_cycle_key() -> String {
    "R".to_string()
}

pub fn default_brightness_up_key() -> String {
    "Up".to_string()
}

pub fn default_brightness_down_key() -> String {
    "Down".to_string()
}
