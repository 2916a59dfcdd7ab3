use windows::Win32::UI::Input::KeyboardAndMouse::GetAsyncKeyState;

use crate::hotkey::{Key, KeyboardState, Modifiers};

/// Physical key state as the OS sees it right now, independent of which
/// window has focus.
#[derive(Default)]
pub struct AsyncKeyboardState;

fn is_down(key: Key) -> bool {
    let state = unsafe { GetAsyncKeyState(key.vk() as i32) };
    (state as u16 & 0x8000) != 0
}

impl KeyboardState for AsyncKeyboardState {
    fn live_modifiers(&self) -> Modifiers {
        Modifiers::from_key_state(is_down)
    }
}
