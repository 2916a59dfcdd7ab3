//! Topmost, click-through popup that shows an `OsdContent` near the bottom
//! of the primary work area. Lives on the UI thread.

use std::cell::RefCell;
use std::sync::Once;
use std::time::Instant;

use tracing::debug;
use windows::core::{w, Result};
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Gdi::*;
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::*;

use super::osd::{OsdContent, OsdTimer, OSD_DURATION};

static REGISTER_OSD_CLASS: Once = Once::new();

const OSD_WIDTH: i32 = 240;
const OSD_HEIGHT: i32 = 96;
const BOTTOM_MARGIN: i32 = 60;
const HIDE_TIMER_ID: usize = 1;

struct OsdState {
    content: Option<OsdContent>,
    timer: OsdTimer,
    dark: bool,
}

thread_local! {
    static OSD_STATE: RefCell<OsdState> = RefCell::new(OsdState {
        content: None,
        timer: OsdTimer::default(),
        dark: true,
    });
}

pub struct OsdWindow {
    hwnd: HWND,
}

impl OsdWindow {
    pub fn create() -> Result<Self> {
        unsafe {
            let instance = GetModuleHandleW(None)?;
            let class_name = w!("LapKeys_Osd");

            REGISTER_OSD_CLASS.call_once(|| {
                let wc = WNDCLASSW {
                    style: CS_HREDRAW | CS_VREDRAW,
                    lpfnWndProc: Some(osd_wnd_proc),
                    hInstance: instance.into(),
                    lpszClassName: class_name,
                    ..Default::default()
                };
                let _ = RegisterClassW(&wc);
            });

            let hwnd = CreateWindowExW(
                WS_EX_LAYERED | WS_EX_TOPMOST | WS_EX_TOOLWINDOW | WS_EX_TRANSPARENT | WS_EX_NOACTIVATE,
                class_name,
                w!("LapKeys OSD"),
                WS_POPUP,
                0,
                0,
                OSD_WIDTH,
                OSD_HEIGHT,
                None,
                None,
                Some(instance.into()),
                None,
            )?;
            SetLayeredWindowAttributes(hwnd, COLORREF(0), 235, LWA_ALPHA)?;
            Ok(Self { hwnd })
        }
    }

    pub fn set_dark(&self, dark: bool) {
        OSD_STATE.with(|s| s.borrow_mut().dark = dark);
    }

    /// Shows `content` and restarts the dismiss countdown.
    pub fn show(&self, content: OsdContent) {
        OSD_STATE.with(|s| {
            let mut state = s.borrow_mut();
            state.content = Some(content);
            state.timer.show(Instant::now());
        });
        debug!(?content, "osd shown");

        let (x, y) = bottom_center();
        unsafe {
            let _ = SetWindowPos(
                self.hwnd,
                Some(HWND_TOPMOST),
                x,
                y,
                OSD_WIDTH,
                OSD_HEIGHT,
                SWP_NOACTIVATE | SWP_SHOWWINDOW,
            );
            let _ = InvalidateRect(Some(self.hwnd), None, true);
            // Re-arming an existing timer id replaces its interval.
            SetTimer(
                Some(self.hwnd),
                HIDE_TIMER_ID,
                OSD_DURATION.as_millis() as u32,
                None,
            );
        }
    }
}

impl Drop for OsdWindow {
    fn drop(&mut self) {
        OSD_STATE.with(|s| s.borrow_mut().timer.cancel());
        unsafe {
            let _ = KillTimer(Some(self.hwnd), HIDE_TIMER_ID);
            let _ = DestroyWindow(self.hwnd);
        }
    }
}

fn bottom_center() -> (i32, i32) {
    let mut work = RECT::default();
    let ok = unsafe {
        SystemParametersInfoW(
            SPI_GETWORKAREA,
            0,
            Some(&mut work as *mut RECT as *mut _),
            SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS(0),
        )
        .is_ok()
    };
    if !ok {
        work = RECT {
            left: 0,
            top: 0,
            right: unsafe { GetSystemMetrics(SM_CXSCREEN) },
            bottom: unsafe { GetSystemMetrics(SM_CYSCREEN) },
        };
    }
    let x = work.left + (work.right - work.left - OSD_WIDTH) / 2;
    let y = work.bottom - OSD_HEIGHT - BOTTOM_MARGIN;
    (x, y)
}

unsafe extern "system" fn osd_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_TIMER if wparam.0 == HIDE_TIMER_ID => {
            let left = OSD_STATE.with(|s| s.borrow().timer.remaining(Instant::now()));
            match left {
                Some(left) => {
                    SetTimer(Some(hwnd), HIDE_TIMER_ID, left.as_millis().max(1) as u32, None);
                }
                None => {
                    let _ = KillTimer(Some(hwnd), HIDE_TIMER_ID);
                    OSD_STATE.with(|s| s.borrow_mut().timer.cancel());
                    let _ = ShowWindow(hwnd, SW_HIDE);
                }
            }
            LRESULT(0)
        }
        WM_PAINT => {
            paint(hwnd);
            LRESULT(0)
        }
        WM_ERASEBKGND => LRESULT(1),
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

struct Palette {
    background: u32,
    headline: u32,
    caption: u32,
    track: u32,
    accent: u32,
}

// COLORREF is 0x00BBGGRR.
const DARK: Palette = Palette {
    background: 0x00202020,
    headline: 0x00FFFFFF,
    caption: 0x00B4B4B4,
    track: 0x00464646,
    accent: 0x00D47800,
};

const LIGHT: Palette = Palette {
    background: 0x00F3F3F3,
    headline: 0x001A1A1A,
    caption: 0x00606060,
    track: 0x00D0D0D0,
    accent: 0x00C06000,
};

unsafe fn paint(hwnd: HWND) {
    let mut ps = PAINTSTRUCT::default();
    let hdc = BeginPaint(hwnd, &mut ps);

    let mut client = RECT::default();
    let _ = GetClientRect(hwnd, &mut client);
    let (content, dark) = OSD_STATE.with(|s| {
        let s = s.borrow();
        (s.content, s.dark)
    });
    let palette = if dark { &DARK } else { &LIGHT };

    fill(hdc, &client, palette.background);

    if let Some(content) = content {
        let caption_rect = RECT {
            left: 16,
            top: 10,
            right: client.right - 16,
            bottom: 30,
        };
        draw_text(
            hdc,
            content.caption(),
            caption_rect,
            15,
            FW_NORMAL.0 as i32,
            palette.caption,
        );

        let bar = content.bar_fraction();
        let headline_rect = RECT {
            left: 16,
            top: 30,
            right: client.right - 16,
            bottom: if bar.is_some() { 68 } else { client.bottom - 10 },
        };
        draw_text(
            hdc,
            &content.headline(),
            headline_rect,
            34,
            FW_BOLD.0 as i32,
            palette.headline,
        );

        if let Some(fraction) = bar {
            let track = RECT {
                left: 20,
                top: 74,
                right: client.right - 20,
                bottom: 80,
            };
            fill(hdc, &track, palette.track);
            let filled = RECT {
                right: track.left + ((track.right - track.left) as f32 * fraction) as i32,
                ..track
            };
            fill(hdc, &filled, palette.accent);
        }
    }

    let _ = EndPaint(hwnd, &ps);
}

unsafe fn fill(hdc: HDC, rect: &RECT, color: u32) {
    let brush = CreateSolidBrush(COLORREF(color));
    FillRect(hdc, rect, brush);
    let _ = DeleteObject(brush.into());
}

unsafe fn draw_text(hdc: HDC, text: &str, mut rect: RECT, height: i32, weight: i32, color: u32) {
    let font = CreateFontW(
        height,
        0,
        0,
        0,
        weight,
        0,
        0,
        0,
        DEFAULT_CHARSET,
        OUT_DEFAULT_PRECIS,
        CLIP_DEFAULT_PRECIS,
        CLEARTYPE_QUALITY,
        (VARIABLE_PITCH.0 | FF_SWISS.0) as u32,
        w!("Segoe UI"),
    );
    let old_font = SelectObject(hdc, font.into());
    SetBkMode(hdc, TRANSPARENT);
    SetTextColor(hdc, COLORREF(color));

    let mut wide: Vec<u16> = text.encode_utf16().collect();
    DrawTextW(
        hdc,
        &mut wide,
        &mut rect,
        DT_CENTER | DT_VCENTER | DT_SINGLELINE,
    );

    SelectObject(hdc, old_font);
    let _ = DeleteObject(font.into());
}
