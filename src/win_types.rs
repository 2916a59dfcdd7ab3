//! Handle wrappers that may cross threads, plus small Win32 string helpers.

use windows::Win32::Foundation::{HANDLE, HWND};

/// Kernel object handle shared with helper threads (events, mutexes).
#[derive(Clone, Copy, Debug)]
pub struct SendHandle(pub HANDLE);

unsafe impl Send for SendHandle {}
unsafe impl Sync for SendHandle {}

/// A window handle posted to from other threads.
#[derive(Clone, Copy, Debug, Default)]
pub struct SendHwnd(pub HWND);

unsafe impl Send for SendHwnd {}
unsafe impl Sync for SendHwnd {}

impl SendHwnd {
    pub fn to_raw(self) -> isize {
        self.0 .0 as isize
    }

    pub fn from_raw(raw: isize) -> Option<Self> {
        (raw != 0).then(|| SendHwnd(HWND(raw as *mut _)))
    }
}

/// NUL-terminated UTF-16 for `PCWSTR` parameters.
pub fn to_wstring(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}
