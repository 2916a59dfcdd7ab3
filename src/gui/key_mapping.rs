use crate::hotkey::Key;
use eframe::egui;

/// The key behind an input event while a hotkey is being captured.
/// egui-winit reports Ctrl+C, Ctrl+X and Ctrl+V as clipboard events rather
/// than key presses, so those are mapped back to their letter.
pub fn captured_key(event: &egui::Event) -> Option<egui::Key> {
    match event {
        egui::Event::Key {
            key, pressed: true, ..
        } => Some(*key),
        egui::Event::Copy => Some(egui::Key::C),
        egui::Event::Cut => Some(egui::Key::X),
        egui::Event::Paste(_) => Some(egui::Key::V),
        _ => None,
    }
}

/// Maps an egui key event onto the physical key it came from. egui reports
/// no events for bare modifiers, so those never reach this function.
pub fn egui_key_to_key(key: &egui::Key) -> Option<Key> {
    use egui::Key as E;

    let mapped = match key {
        E::A => Key::A,
        E::B => Key::B,
        E::C => Key::C,
        E::D => Key::D,
        E::E => Key::E,
        E::F => Key::F,
        E::G => Key::G,
        E::H => Key::H,
        E::I => Key::I,
        E::J => Key::J,
        E::K => Key::K,
        E::L => Key::L,
        E::M => Key::M,
        E::N => Key::N,
        E::O => Key::O,
        E::P => Key::P,
        E::Q => Key::Q,
        E::R => Key::R,
        E::S => Key::S,
        E::T => Key::T,
        E::U => Key::U,
        E::V => Key::V,
        E::W => Key::W,
        E::X => Key::X,
        E::Y => Key::Y,
        E::Z => Key::Z,

        E::Num0 => Key::D0,
        E::Num1 => Key::D1,
        E::Num2 => Key::D2,
        E::Num3 => Key::D3,
        E::Num4 => Key::D4,
        E::Num5 => Key::D5,
        E::Num6 => Key::D6,
        E::Num7 => Key::D7,
        E::Num8 => Key::D8,
        E::Num9 => Key::D9,

        E::F1 => Key::F1,
        E::F2 => Key::F2,
        E::F3 => Key::F3,
        E::F4 => Key::F4,
        E::F5 => Key::F5,
        E::F6 => Key::F6,
        E::F7 => Key::F7,
        E::F8 => Key::F8,
        E::F9 => Key::F9,
        E::F10 => Key::F10,
        E::F11 => Key::F11,
        E::F12 => Key::F12,
        E::F13 => Key::F13,
        E::F14 => Key::F14,
        E::F15 => Key::F15,
        E::F16 => Key::F16,
        E::F17 => Key::F17,
        E::F18 => Key::F18,
        E::F19 => Key::F19,
        E::F20 => Key::F20,
        E::F21 => Key::F21,
        E::F22 => Key::F22,
        E::F23 => Key::F23,
        E::F24 => Key::F24,

        E::ArrowUp => Key::Up,
        E::ArrowDown => Key::Down,
        E::ArrowLeft => Key::Left,
        E::ArrowRight => Key::Right,
        E::Escape => Key::Escape,
        E::Tab => Key::Tab,
        E::Backspace => Key::Back,
        E::Enter => Key::Enter,
        E::Space => Key::Space,
        E::Insert => Key::Insert,
        E::Delete => Key::Delete,
        E::Home => Key::Home,
        E::End => Key::End,
        E::PageUp => Key::PageUp,
        E::PageDown => Key::PageDown,

        E::Semicolon => Key::OemSemicolon,
        E::Equals | E::Plus => Key::OemPlus,
        E::Comma => Key::OemComma,
        E::Minus => Key::OemMinus,
        E::Period => Key::OemPeriod,
        E::Slash | E::Questionmark => Key::OemQuestion,
        E::Backtick => Key::OemTilde,
        E::OpenBracket => Key::OemOpenBrackets,
        E::Backslash | E::Pipe => Key::OemPipe,
        E::CloseBracket => Key::OemCloseBrackets,
        E::Quote => Key::OemQuotes,
        _ => return None,
    };
    Some(mapped)
}
