use std::fmt;

use thiserror::Error;

/// One mode reported by the display driver. Equality covers all four fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DisplayMode {
    pub width: u32,
    pub height: u32,
    pub refresh_rate: u32,
    pub bits_per_pixel: u32,
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} @ {}Hz", self.width, self.height, self.refresh_rate)
    }
}

/// A refresh rate as presented in the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshRateOption {
    pub rate: u32,
    /// True iff this is the active rate.
    pub is_selected: bool,
    pub is_included_in_cycle: bool,
}

impl RefreshRateOption {
    pub fn display_text(&self) -> String {
        format!("{} Hz", self.rate)
    }
}

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("the current display mode could not be read")]
    NoCurrentMode,
    #[error("{width}x{height} @ {rate}Hz was rejected by the driver (code {code})")]
    ModeRejected {
        width: u32,
        height: u32,
        rate: u32,
        code: i32,
    },
    #[error("switching to {width}x{height} @ {rate}Hz failed (code {code})")]
    ApplyFailed {
        width: u32,
        height: u32,
        rate: u32,
        code: i32,
    },
}

/// Enumeration and mutation of the primary display's modes.
pub trait DisplayModes {
    fn current_mode(&self) -> Result<DisplayMode, DisplayError>;

    /// Every distinct mode the driver reports.
    fn all_modes(&self) -> Vec<DisplayMode>;

    /// Switches resolution and refresh rate; the change is tested before it
    /// is committed.
    fn apply(&mut self, width: u32, height: u32, refresh_rate: u32) -> Result<(), DisplayError>;

    /// Distinct rates available at `width`x`height`, ascending.
    fn available_refresh_rates(&self, width: u32, height: u32) -> Vec<u32> {
        let mut rates: Vec<u32> = self
            .all_modes()
            .into_iter()
            .filter(|m| m.width == width && m.height == height)
            .map(|m| m.refresh_rate)
            .collect();
        rates.sort_unstable();
        rates.dedup();
        rates
    }

    /// Changes only the refresh rate, keeping the current resolution.
    fn set_refresh_rate(&mut self, refresh_rate: u32) -> Result<DisplayMode, DisplayError> {
        let current = self.current_mode()?;
        self.apply(current.width, current.height, refresh_rate)?;
        Ok(DisplayMode {
            refresh_rate,
            ..current
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeDisplay;

    #[test]
    fn rates_are_filtered_by_resolution_and_sorted() {
        let display = FakeDisplay::new(
            (1920, 1080, 60),
            &[
                (1920, 1080, 144),
                (1920, 1080, 60),
                (1280, 720, 75),
                (1920, 1080, 120),
                (1920, 1080, 60),
            ],
        );
        assert_eq!(display.available_refresh_rates(1920, 1080), vec![60, 120, 144]);
        assert_eq!(display.available_refresh_rates(1280, 720), vec![75]);
        assert!(display.available_refresh_rates(800, 600).is_empty());
    }

    #[test]
    fn set_refresh_rate_keeps_resolution() {
        let mut display = FakeDisplay::new((1920, 1080, 60), &[(1920, 1080, 60), (1920, 1080, 144)]);
        let mode = display.set_refresh_rate(144).unwrap();
        assert_eq!((mode.width, mode.height, mode.refresh_rate), (1920, 1080, 144));
        assert_eq!(display.applied(), vec![(1920, 1080, 144)]);
    }

    #[test]
    fn mode_text() {
        let mode = DisplayMode {
            width: 2560,
            height: 1600,
            refresh_rate: 165,
            bits_per_pixel: 32,
        };
        assert_eq!(mode.to_string(), "2560x1600 @ 165Hz");
    }
}
