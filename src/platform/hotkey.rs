//! Message-only window on the UI thread. It owns the `RegisterHotKey`
//! registrations and receives `WM_HOTKEY` plus the shell messages posted by
//! the tray and single-instance threads.

use std::cell::RefCell;
use std::sync::atomic::{AtomicIsize, Ordering};
use std::sync::Once;

use tracing::{debug, error, warn};
use windows::core::w;
use windows::Win32::Foundation::*;
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    RegisterHotKey, UnregisterHotKey, HOT_KEY_MODIFIERS, MOD_NOREPEAT,
};
use windows::Win32::UI::WindowsAndMessaging::*;

use crate::hotkey::{HotkeyError, HotkeyRegistrar, Key, Modifiers};
use crate::win_types::SendHwnd;

static REGISTER_SHELL_CLASS: Once = Once::new();
static SHELL_HWND: AtomicIsize = AtomicIsize::new(0);

const WM_APP_SHELL: u32 = WM_APP + 1;
const SHELL_SHOW: usize = 1;
const SHELL_EXIT: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShellMessage {
    Hotkey(i32),
    ShowWindow,
    Exit,
}

type Handler = Box<dyn FnMut(ShellMessage)>;

thread_local! {
    static HANDLER: RefCell<Option<Handler>> = RefCell::new(None);
}

/// Installs the callback the window procedure dispatches to. Must be called
/// on the thread that created the window.
pub fn set_shell_handler(handler: impl FnMut(ShellMessage) + 'static) {
    HANDLER.with(|h| *h.borrow_mut() = Some(Box::new(handler)));
}

/// Posts a shell message from any thread. Dropped if the window is gone.
pub fn post_to_shell(message: ShellMessage) {
    let Some(hwnd) = SendHwnd::from_raw(SHELL_HWND.load(Ordering::SeqCst)) else {
        warn!(?message, "shell window not ready");
        return;
    };
    let (msg, wparam) = match message {
        ShellMessage::Hotkey(id) => (WM_HOTKEY, id as usize),
        ShellMessage::ShowWindow => (WM_APP_SHELL, SHELL_SHOW),
        ShellMessage::Exit => (WM_APP_SHELL, SHELL_EXIT),
    };
    unsafe {
        let _ = PostMessageW(Some(hwnd.0), msg, WPARAM(wparam), LPARAM(0));
    }
}

pub struct MessageWindow {
    hwnd: HWND,
}

impl MessageWindow {
    pub fn create() -> windows::core::Result<Self> {
        unsafe {
            let instance = GetModuleHandleW(None)?;
            let class_name = w!("LapKeys_Shell");

            REGISTER_SHELL_CLASS.call_once(|| {
                let wc = WNDCLASSW {
                    lpfnWndProc: Some(shell_wnd_proc),
                    hInstance: instance.into(),
                    lpszClassName: class_name,
                    ..Default::default()
                };
                let _ = RegisterClassW(&wc);
            });

            let hwnd = CreateWindowExW(
                WINDOW_EX_STYLE::default(),
                class_name,
                w!("LapKeys Shell"),
                WINDOW_STYLE::default(),
                0,
                0,
                0,
                0,
                Some(HWND_MESSAGE),
                None,
                Some(instance.into()),
                None,
            )?;
            SHELL_HWND.store(SendHwnd(hwnd).to_raw(), Ordering::SeqCst);
            debug!("shell message window created");
            Ok(Self { hwnd })
        }
    }

    pub fn registrar(&self) -> Win32Registrar {
        Win32Registrar { hwnd: self.hwnd }
    }
}

impl Drop for MessageWindow {
    fn drop(&mut self) {
        SHELL_HWND.store(0, Ordering::SeqCst);
        HANDLER.with(|h| h.borrow_mut().take());
        unsafe {
            let _ = DestroyWindow(self.hwnd);
        }
    }
}

unsafe extern "system" fn shell_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let message = match msg {
        WM_HOTKEY => ShellMessage::Hotkey(wparam.0 as i32),
        WM_APP_SHELL if wparam.0 == SHELL_SHOW => ShellMessage::ShowWindow,
        WM_APP_SHELL if wparam.0 == SHELL_EXIT => ShellMessage::Exit,
        _ => return DefWindowProcW(hwnd, msg, wparam, lparam),
    };
    dispatch(message);
    LRESULT(0)
}

/// Runs the handler with it taken out of its slot, so a nested message pump
/// inside the handler cannot re-enter it.
fn dispatch(message: ShellMessage) {
    let Some(mut handler) = HANDLER.with(|h| h.borrow_mut().take()) else {
        debug!(?message, "no shell handler, message dropped");
        return;
    };
    handler(message);
    HANDLER.with(|h| {
        let mut slot = h.borrow_mut();
        if slot.is_none() {
            *slot = Some(handler);
        }
    });
}

/// `RegisterHotKey` against the shell window. Every registration carries
/// `MOD_NOREPEAT` so a held chord fires once.
pub struct Win32Registrar {
    hwnd: HWND,
}

impl HotkeyRegistrar for Win32Registrar {
    fn register(&mut self, id: i32, modifiers: Modifiers, key: Key) -> Result<(), HotkeyError> {
        let mods = HOT_KEY_MODIFIERS(modifiers.bits() | MOD_NOREPEAT.0);
        unsafe { RegisterHotKey(Some(self.hwnd), id, mods, key.vk()) }.map_err(|e| {
            if e.code() == ERROR_HOTKEY_ALREADY_REGISTERED.to_hresult() {
                HotkeyError::Conflict {
                    chord: format!("{} + {}", modifiers.to_setting_string(), key),
                }
            } else {
                error!(id, error = %e, "RegisterHotKey failed");
                HotkeyError::Unavailable(e.message().to_string())
            }
        })
    }

    fn unregister(&mut self, id: i32) -> Result<(), HotkeyError> {
        unsafe { UnregisterHotKey(Some(self.hwnd), id) }
            .map_err(|_| HotkeyError::NotRegistered(id))
    }
}
