//! Procedurally drawn application icon: a laptop lid with a sun in the
//! middle. No image assets ship with the binary.

use image::{Rgba, RgbaImage};

const TRAY_SIZE: u32 = 32;
const WINDOW_SIZE: u32 = 64;

const LIGHT_GLYPH: [u8; 3] = [255, 255, 255];
const DARK_GLYPH: [u8; 3] = [40, 40, 48];
const ACCENT: [u8; 3] = [64, 140, 230];

#[inline(always)]
fn sd_rounded_box(px: f32, py: f32, bx: f32, by: f32, r: f32) -> f32 {
    let qx = px.abs() - bx + r;
    let qy = py.abs() - by + r;
    let len_max_q = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
    let min_max_q = qx.max(qy).min(0.0);
    len_max_q + min_max_q - r
}

/// One pixel of antialiasing across the shape edge.
#[inline(always)]
fn coverage(d: f32) -> f32 {
    (0.5 - d).clamp(0.0, 1.0)
}

/// Renders the glyph in `color` on a transparent square of `size` pixels.
pub fn render_icon(size: u32, color: [u8; 3]) -> RgbaImage {
    let s = size as f32;
    RgbaImage::from_fn(size, size, |x, y| {
        let px = x as f32 + 0.5;
        let py = y as f32 + 0.5;

        // Lid outline
        let lid = sd_rounded_box(px - 0.5 * s, py - 0.42 * s, 0.40 * s, 0.28 * s, 0.06 * s);
        let lid = lid.abs() - 0.035 * s;
        // Base
        let base = sd_rounded_box(px - 0.5 * s, py - 0.82 * s, 0.46 * s, 0.045 * s, 0.04 * s);
        // Sun
        let sun = ((px - 0.5 * s).powi(2) + (py - 0.42 * s).powi(2)).sqrt() - 0.10 * s;

        let alpha = coverage(lid).max(coverage(base)).max(coverage(sun));
        Rgba([color[0], color[1], color[2], (alpha * 255.0).round() as u8])
    })
}

/// Tray glyph color for the taskbar theme: white on a dark taskbar.
pub fn tray_glyph_color(is_system_dark: bool) -> [u8; 3] {
    if is_system_dark {
        LIGHT_GLYPH
    } else {
        DARK_GLYPH
    }
}

#[cfg(windows)]
pub use self::native::{get_tray_icon, get_window_icon};

#[cfg(windows)]
mod native {
    use super::*;
    use eframe::egui;
    use lazy_static::lazy_static;
    use tray_icon::Icon;
    use tracing::warn;

    // Wrapper to make Icon thread-safe for lazy_static
    struct SafeIcon(Icon);
    unsafe impl Send for SafeIcon {}
    unsafe impl Sync for SafeIcon {}

    lazy_static! {
        static ref TRAY_ICON_DARK: Option<SafeIcon> = build_tray_icon(true);
        static ref TRAY_ICON_LIGHT: Option<SafeIcon> = build_tray_icon(false);
    }

    fn build_tray_icon(is_system_dark: bool) -> Option<SafeIcon> {
        let img = render_icon(TRAY_SIZE, tray_glyph_color(is_system_dark));
        let (width, height) = img.dimensions();
        match Icon::from_rgba(img.into_raw(), width, height) {
            Ok(icon) => Some(SafeIcon(icon)),
            Err(e) => {
                warn!(error = %e, "tray icon rejected");
                None
            }
        }
    }

    /// is_system_dark: TRUE if the taskbar is dark
    pub fn get_tray_icon(is_system_dark: bool) -> Option<Icon> {
        let cached = if is_system_dark {
            &*TRAY_ICON_DARK
        } else {
            &*TRAY_ICON_LIGHT
        };
        cached.as_ref().map(|icon| icon.0.clone())
    }

    pub fn get_window_icon(is_dark: bool) -> egui::IconData {
        let color = if is_dark { LIGHT_GLYPH } else { ACCENT };
        let img = render_icon(WINDOW_SIZE, color);
        let (width, height) = img.dimensions();
        egui::IconData {
            rgba: img.into_raw(),
            width,
            height,
        }
    }
}
