//! Win32 implementations of the OS seams.

mod brightness;
mod display;
mod hotkey;
mod keyboard;

pub use brightness::WmiBrightness;
pub use display::Win32DisplayModes;
pub use hotkey::{post_to_shell, set_shell_handler, MessageWindow, ShellMessage, Win32Registrar};
pub use keyboard::AsyncKeyboardState;
