//! Physical keys and modifier sets, both expressed in Win32 terms so they can
//! be handed straight to `RegisterHotKey`.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Modifier set using the `MOD_*` bit values of `RegisterHotKey`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u32);

impl Modifiers {
    pub const NONE: Self = Self(0);
    pub const ALT: Self = Self(0x0001);
    pub const CONTROL: Self = Self(0x0002);
    pub const SHIFT: Self = Self(0x0004);
    pub const WIN: Self = Self(0x0008);

    /// Names used in the settings file, in flag order.
    const SETTING_NAMES: [(Modifiers, &'static str); 4] = [
        (Self::ALT, "Alt"),
        (Self::CONTROL, "Control"),
        (Self::SHIFT, "Shift"),
        (Self::WIN, "Windows"),
    ];

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & 0x000F)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Builds the live modifier set from a key-state probe, OR-ing the left
    /// and right variant of every modifier.
    pub fn from_key_state(is_down: impl Fn(Key) -> bool) -> Self {
        let mut mods = Self::NONE;
        if is_down(Key::LeftCtrl) || is_down(Key::RightCtrl) {
            mods |= Self::CONTROL;
        }
        if is_down(Key::LeftAlt) || is_down(Key::RightAlt) {
            mods |= Self::ALT;
        }
        if is_down(Key::LeftShift) || is_down(Key::RightShift) {
            mods |= Self::SHIFT;
        }
        if is_down(Key::LWin) || is_down(Key::RWin) {
            mods |= Self::WIN;
        }
        mods
    }

    /// `"Control, Shift"` style text stored in the settings file.
    pub fn to_setting_string(self) -> String {
        Self::SETTING_NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn from_setting_string(text: &str) -> Self {
        let mut mods = Self::NONE;
        for (flag, name) in Self::SETTING_NAMES {
            if text.contains(name) {
                mods |= flag;
            }
        }
        mods
    }
}

impl BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

macro_rules! define_keys {
    ($($variant:ident = $vk:expr, $name:expr;)*) => {
        /// A physical key, carrying its Win32 virtual-key code.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum Key {
            $($variant,)*
        }

        impl Key {
            pub const ALL: &'static [Key] = &[$(Key::$variant,)*];

            pub const fn vk(self) -> u32 {
                match self {
                    $(Key::$variant => $vk,)*
                }
            }

            pub const fn name(self) -> &'static str {
                match self {
                    $(Key::$variant => $name,)*
                }
            }
        }
    };
}

define_keys! {
    None = 0x00, "None";
    Back = 0x08, "Back";
    Tab = 0x09, "Tab";
    Enter = 0x0D, "Enter";
    Pause = 0x13, "Pause";
    CapsLock = 0x14, "CapsLock";
    Escape = 0x1B, "Escape";
    Space = 0x20, "Space";
    PageUp = 0x21, "PageUp";
    PageDown = 0x22, "PageDown";
    End = 0x23, "End";
    Home = 0x24, "Home";
    Left = 0x25, "Left";
    Up = 0x26, "Up";
    Right = 0x27, "Right";
    Down = 0x28, "Down";
    PrintScreen = 0x2C, "PrintScreen";
    Insert = 0x2D, "Insert";
    Delete = 0x2E, "Delete";
    D0 = 0x30, "D0";
    D1 = 0x31, "D1";
    D2 = 0x32, "D2";
    D3 = 0x33, "D3";
    D4 = 0x34, "D4";
    D5 = 0x35, "D5";
    D6 = 0x36, "D6";
    D7 = 0x37, "D7";
    D8 = 0x38, "D8";
    D9 = 0x39, "D9";
    A = 0x41, "A";
    B = 0x42, "B";
    C = 0x43, "C";
    D = 0x44, "D";
    E = 0x45, "E";
    F = 0x46, "F";
    G = 0x47, "G";
    H = 0x48, "H";
    I = 0x49, "I";
    J = 0x4A, "J";
    K = 0x4B, "K";
    L = 0x4C, "L";
    M = 0x4D, "M";
    N = 0x4E, "N";
    O = 0x4F, "O";
    P = 0x50, "P";
    Q = 0x51, "Q";
    R = 0x52, "R";
    S = 0x53, "S";
    T = 0x54, "T";
    U = 0x55, "U";
    V = 0x56, "V";
    W = 0x57, "W";
    X = 0x58, "X";
    Y = 0x59, "Y";
    Z = 0x5A, "Z";
    LWin = 0x5B, "LWin";
    RWin = 0x5C, "RWin";
    Apps = 0x5D, "Apps";
    NumPad0 = 0x60, "NumPad0";
    NumPad1 = 0x61, "NumPad1";
    NumPad2 = 0x62, "NumPad2";
    NumPad3 = 0x63, "NumPad3";
    NumPad4 = 0x64, "NumPad4";
    NumPad5 = 0x65, "NumPad5";
    NumPad6 = 0x66, "NumPad6";
    NumPad7 = 0x67, "NumPad7";
    NumPad8 = 0x68, "NumPad8";
    NumPad9 = 0x69, "NumPad9";
    Multiply = 0x6A, "Multiply";
    Add = 0x6B, "Add";
    Separator = 0x6C, "Separator";
    Subtract = 0x6D, "Subtract";
    Decimal = 0x6E, "Decimal";
    Divide = 0x6F, "Divide";
    F1 = 0x70, "F1";
    F2 = 0x71, "F2";
    F3 = 0x72, "F3";
    F4 = 0x73, "F4";
    F5 = 0x74, "F5";
    F6 = 0x75, "F6";
    F7 = 0x76, "F7";
    F8 = 0x77, "F8";
    F9 = 0x78, "F9";
    F10 = 0x79, "F10";
    F11 = 0x7A, "F11";
    F12 = 0x7B, "F12";
    F13 = 0x7C, "F13";
    F14 = 0x7D, "F14";
    F15 = 0x7E, "F15";
    F16 = 0x7F, "F16";
    F17 = 0x80, "F17";
    F18 = 0x81, "F18";
    F19 = 0x82, "F19";
    F20 = 0x83, "F20";
    F21 = 0x84, "F21";
    F22 = 0x85, "F22";
    F23 = 0x86, "F23";
    F24 = 0x87, "F24";
    NumLock = 0x90, "NumLock";
    Scroll = 0x91, "Scroll";
    LeftShift = 0xA0, "LeftShift";
    RightShift = 0xA1, "RightShift";
    LeftCtrl = 0xA2, "LeftCtrl";
    RightCtrl = 0xA3, "RightCtrl";
    LeftAlt = 0xA4, "LeftAlt";
    RightAlt = 0xA5, "RightAlt";
    VolumeMute = 0xAD, "VolumeMute";
    VolumeDown = 0xAE, "VolumeDown";
    VolumeUp = 0xAF, "VolumeUp";
    MediaNextTrack = 0xB0, "MediaNextTrack";
    MediaPreviousTrack = 0xB1, "MediaPreviousTrack";
    MediaStop = 0xB2, "MediaStop";
    MediaPlayPause = 0xB3, "MediaPlayPause";
    OemSemicolon = 0xBA, "OemSemicolon";
    OemPlus = 0xBB, "OemPlus";
    OemComma = 0xBC, "OemComma";
    OemMinus = 0xBD, "OemMinus";
    OemPeriod = 0xBE, "OemPeriod";
    OemQuestion = 0xBF, "OemQuestion";
    OemTilde = 0xC0, "OemTilde";
    OemOpenBrackets = 0xDB, "OemOpenBrackets";
    OemPipe = 0xDC, "OemPipe";
    OemCloseBrackets = 0xDD, "OemCloseBrackets";
    OemQuotes = 0xDE, "OemQuotes";
}

impl Key {
    /// Ctrl/Alt/Shift/Win in either the left or right variant.
    pub const fn is_modifier(self) -> bool {
        matches!(
            self,
            Key::LeftCtrl
                | Key::RightCtrl
                | Key::LeftAlt
                | Key::RightAlt
                | Key::LeftShift
                | Key::RightShift
                | Key::LWin
                | Key::RWin
        )
    }

    pub fn from_vk(vk: u32) -> Option<Key> {
        Key::ALL.iter().copied().find(|k| k.vk() == vk)
    }

    /// Case-insensitive lookup by name. Accepts a few alternate spellings
    /// found in older settings files.
    pub fn from_name(name: &str) -> Option<Key> {
        let name = name.trim();
        let alias = match name.to_ascii_lowercase().as_str() {
            "return" => Some(Key::Enter),
            "prior" => Some(Key::PageUp),
            "next" => Some(Key::PageDown),
            "backspace" => Some(Key::Back),
            "esc" => Some(Key::Escape),
            "capital" => Some(Key::CapsLock),
            "snapshot" => Some(Key::PrintScreen),
            "del" => Some(Key::Delete),
            _ => None,
        };
        if alias.is_some() {
            return alias;
        }

        if let Some(found) = Key::ALL
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(name))
        {
            return Some(found);
        }

        // Bare digits ("5") map onto the top-row digit keys.
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_digit() => Key::from_vk(c as u32),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
