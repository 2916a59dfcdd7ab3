use std::fmt;

use super::keys::{Key, Modifiers};

/// The three hotkey slots. Each slot owns a fixed registration id for the
/// lifetime of the process, so re-registering a slot replaces its previous
/// OS registration instead of adding a second one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HotkeyAction {
    CycleRefreshRate,
    BrightnessUp,
    BrightnessDown,
}

impl HotkeyAction {
    pub const ALL: [HotkeyAction; 3] = [
        HotkeyAction::CycleRefreshRate,
        HotkeyAction::BrightnessUp,
        HotkeyAction::BrightnessDown,
    ];

    pub const fn id(self) -> i32 {
        match self {
            HotkeyAction::CycleRefreshRate => 1,
            HotkeyAction::BrightnessUp => 2,
            HotkeyAction::BrightnessDown => 3,
        }
    }

    pub fn from_id(id: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.id() == id)
    }

    pub const fn label(self) -> &'static str {
        match self {
            HotkeyAction::CycleRefreshRate => "Cycle Refresh Rate",
            HotkeyAction::BrightnessUp => "Brightness Up",
            HotkeyAction::BrightnessDown => "Brightness Down",
        }
    }
}

/// A chord bound to an action. Bindings are replaced wholesale on re-capture,
/// never edited in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HotkeyBinding {
    pub name: String,
    pub action: HotkeyAction,
    pub modifiers: Modifiers,
    pub key: Key,
    pub id: i32,
}

impl HotkeyBinding {
    pub fn new(action: HotkeyAction, modifiers: Modifiers, key: Key) -> Self {
        Self {
            name: action.label().to_string(),
            action,
            modifiers,
            key,
            id: action.id(),
        }
    }

    /// A usable chord needs a real key and at least one modifier.
    pub fn is_valid(&self) -> bool {
        self.key != Key::None && !self.modifiers.is_empty()
    }

    /// Parses `"Ctrl + Shift + R"`. Unknown parts are skipped; a missing key
    /// leaves `Key::None`.
    pub fn parse(text: &str, action: HotkeyAction) -> Self {
        let mut modifiers = Modifiers::NONE;
        let mut key = Key::None;

        for part in text.split('+').map(str::trim).filter(|p| !p.is_empty()) {
            match part.to_ascii_uppercase().as_str() {
                "WIN" | "WINDOWS" => modifiers |= Modifiers::WIN,
                "CTRL" | "CONTROL" => modifiers |= Modifiers::CONTROL,
                "ALT" => modifiers |= Modifiers::ALT,
                "SHIFT" => modifiers |= Modifiers::SHIFT,
                _ => {
                    if let Some(k) = Key::from_name(part) {
                        key = k;
                    }
                }
            }
        }

        Self::new(action, modifiers, key)
    }
}

impl fmt::Display for HotkeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.modifiers.contains(Modifiers::WIN) {
            parts.push("Win");
        }
        if self.modifiers.contains(Modifiers::CONTROL) {
            parts.push("Ctrl");
        }
        if self.modifiers.contains(Modifiers::ALT) {
            parts.push("Alt");
        }
        if self.modifiers.contains(Modifiers::SHIFT) {
            parts.push("Shift");
        }
        parts.push(self.key.name());
        f.write_str(&parts.join(" + "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_fixed_per_action() {
        assert_eq!(HotkeyAction::CycleRefreshRate.id(), 1);
        assert_eq!(HotkeyAction::BrightnessUp.id(), 2);
        assert_eq!(HotkeyAction::BrightnessDown.id(), 3);
        assert_eq!(HotkeyAction::from_id(2), Some(HotkeyAction::BrightnessUp));
        assert_eq!(HotkeyAction::from_id(0), None);
        assert_eq!(HotkeyAction::from_id(4), None);
    }

    #[test]
    fn display_text_parses_back() {
        let binding = HotkeyBinding::new(
            HotkeyAction::CycleRefreshRate,
            Modifiers::SHIFT | Modifiers::CONTROL,
            Key::R,
        );
        let text = binding.to_string();
        assert_eq!(text, "Ctrl + Shift + R");
        assert_eq!(HotkeyBinding::parse(&text, HotkeyAction::CycleRefreshRate), binding);
    }

    #[test]
    fn parse_is_case_insensitive_and_skips_junk() {
        let binding = HotkeyBinding::parse("windows + alt + ??? + f5", HotkeyAction::BrightnessUp);
        assert_eq!(binding.modifiers, Modifiers::WIN | Modifiers::ALT);
        assert_eq!(binding.key, Key::F5);
        assert_eq!(binding.id, 2);
    }

    #[test]
    fn validity_needs_key_and_modifier() {
        let bare = HotkeyBinding::new(HotkeyAction::BrightnessDown, Modifiers::NONE, Key::Down);
        assert!(!bare.is_valid());
        let no_key = HotkeyBinding::parse("Ctrl + Shift", HotkeyAction::BrightnessDown);
        assert_eq!(no_key.key, Key::None);
        assert!(!no_key.is_valid());
        let ok = HotkeyBinding::parse("Ctrl + Down", HotkeyAction::BrightnessDown);
        assert!(ok.is_valid());
    }
}
