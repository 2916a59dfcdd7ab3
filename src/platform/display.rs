use tracing::{debug, warn};
use windows::core::PCWSTR;
use windows::Win32::Graphics::Gdi::{
    ChangeDisplaySettingsExW, EnumDisplaySettingsW, CDS_TEST, CDS_UPDATEREGISTRY,
    DEVMODEW, DISP_CHANGE_SUCCESSFUL, DM_DISPLAYFREQUENCY, DM_PELSHEIGHT, DM_PELSWIDTH,
    ENUM_CURRENT_SETTINGS, ENUM_DISPLAY_SETTINGS_MODE,
};

use crate::display::{DisplayError, DisplayMode, DisplayModes};

/// The primary display through `EnumDisplaySettingsW`.
#[derive(Default)]
pub struct Win32DisplayModes;

fn empty_devmode() -> DEVMODEW {
    DEVMODEW {
        dmSize: std::mem::size_of::<DEVMODEW>() as u16,
        ..Default::default()
    }
}

fn to_mode(dm: &DEVMODEW) -> DisplayMode {
    DisplayMode {
        width: dm.dmPelsWidth,
        height: dm.dmPelsHeight,
        refresh_rate: dm.dmDisplayFrequency,
        bits_per_pixel: dm.dmBitsPerPel,
    }
}

fn enum_mode(index: ENUM_DISPLAY_SETTINGS_MODE) -> Option<DisplayMode> {
    let mut dm = empty_devmode();
    let found = unsafe { EnumDisplaySettingsW(PCWSTR::null(), index, &mut dm) }.as_bool();
    found.then(|| to_mode(&dm))
}

impl DisplayModes for Win32DisplayModes {
    fn current_mode(&self) -> Result<DisplayMode, DisplayError> {
        enum_mode(ENUM_CURRENT_SETTINGS).ok_or(DisplayError::NoCurrentMode)
    }

    fn all_modes(&self) -> Vec<DisplayMode> {
        let mut modes = Vec::new();
        let mut index = 0u32;
        while let Some(mode) = enum_mode(ENUM_DISPLAY_SETTINGS_MODE(index)) {
            if !modes.contains(&mode) {
                modes.push(mode);
            }
            index += 1;
        }
        debug!(count = modes.len(), "display modes enumerated");
        modes
    }

    fn apply(&mut self, width: u32, height: u32, refresh_rate: u32) -> Result<(), DisplayError> {
        let mut dm = empty_devmode();
        dm.dmPelsWidth = width;
        dm.dmPelsHeight = height;
        dm.dmDisplayFrequency = refresh_rate;
        dm.dmFields = DM_PELSWIDTH | DM_PELSHEIGHT | DM_DISPLAYFREQUENCY;

        let test = unsafe {
            ChangeDisplaySettingsExW(
                PCWSTR::null(),
                Some(&dm as *const DEVMODEW),
                None,
                CDS_TEST,
                None,
            )
        };
        if test != DISP_CHANGE_SUCCESSFUL {
            warn!(width, height, refresh_rate, code = test.0, "mode test failed");
            return Err(DisplayError::ModeRejected {
                width,
                height,
                rate: refresh_rate,
                code: test.0,
            });
        }

        let result = unsafe {
            ChangeDisplaySettingsExW(
                PCWSTR::null(),
                Some(&dm as *const DEVMODEW),
                None,
                CDS_UPDATEREGISTRY,
                None,
            )
        };
        if result != DISP_CHANGE_SUCCESSFUL {
            return Err(DisplayError::ApplyFailed {
                width,
                height,
                rate: refresh_rate,
                code: result.0,
            });
        }
        Ok(())
    }
}
