use windows::Win32::UI::Input::KeyboardAndMouse::SetFocus;
use windows::Win32::UI::WindowsAndMessaging::{
    FindWindowW, SetForegroundWindow, ShowWindow, SW_RESTORE, SW_SHOW,
};
use winreg::enums::HKEY_CURRENT_USER;
use winreg::RegKey;

use crate::win_types::to_wstring;

const PERSONALIZE_KEY: &str = "Software\\Microsoft\\Windows\\CurrentVersion\\Themes\\Personalize";

/// Whether the taskbar uses the dark theme. Missing values read as dark.
pub fn is_system_in_dark_mode() -> bool {
    let hkcu = RegKey::predef(HKEY_CURRENT_USER);
    hkcu.open_subkey(PERSONALIZE_KEY)
        .and_then(|key| key.get_value::<u32, _>("SystemUsesLightTheme"))
        .map(|light| light == 0)
        .unwrap_or(true)
}

/// Shows the settings window straight through Win32. eframe stops running
/// frames for a hidden window, so the viewport commands alone never arrive.
pub fn show_main_window_native(title: &str) {
    let title = to_wstring(title);
    unsafe {
        let hwnd = FindWindowW(None, windows::core::PCWSTR(title.as_ptr())).unwrap_or_default();
        if !hwnd.is_invalid() {
            let _ = ShowWindow(hwnd, SW_RESTORE);
            let _ = ShowWindow(hwnd, SW_SHOW);
            let _ = SetForegroundWindow(hwnd);
            let _ = SetFocus(Some(hwnd));
        }
    }
}
