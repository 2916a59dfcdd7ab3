//! Hotkey bindings, the OS registration table and the capture state machine.

mod binding;
mod capture;
mod keys;
mod table;

pub use binding::{HotkeyAction, HotkeyBinding};
pub use capture::{CaptureError, CaptureOutcome, CaptureState, HotkeyCapture, KeyboardState};
pub use keys::{Key, Modifiers};
pub use table::{HotkeyError, HotkeyRegistrar, HotkeyTable};
