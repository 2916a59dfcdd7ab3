//! Screen brightness with a cached capability flag.
//!
//! Brightness control is absent on many desktops (no WMI monitor class). The
//! first failure marks the capability unsupported and the backend is not
//! called again for the rest of the process.

use thiserror::Error;
use tracing::{debug, warn};

pub const BRIGHTNESS_STEP: u8 = 10;
pub const MAX_BRIGHTNESS: u8 = 100;

#[derive(Debug, Error)]
pub enum BrightnessError {
    #[error("brightness control is not supported on this device")]
    Unsupported,
    #[error("brightness backend failed: {0}")]
    Backend(String),
}

/// Raw access to the panel brightness, 0-100.
pub trait BrightnessBackend {
    fn get(&mut self) -> Result<u8, BrightnessError>;
    fn set(&mut self, level: u8) -> Result<(), BrightnessError>;
}

impl<B: BrightnessBackend + ?Sized> BrightnessBackend for Box<B> {
    fn get(&mut self) -> Result<u8, BrightnessError> {
        (**self).get()
    }

    fn set(&mut self, level: u8) -> Result<(), BrightnessError> {
        (**self).set(level)
    }
}

pub struct BrightnessControl<B> {
    backend: B,
    supported: bool,
    last_set: Option<u8>,
}

impl<B: BrightnessBackend> BrightnessControl<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            supported: true,
            last_set: None,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.supported
    }

    /// Queries the panel. `None` once the capability is known to be missing.
    pub fn current(&mut self) -> Option<u8> {
        if !self.supported {
            return None;
        }
        match self.backend.get() {
            Ok(level) => {
                let level = level.min(MAX_BRIGHTNESS);
                self.last_set = Some(level);
                Some(level)
            }
            Err(e) => {
                self.mark_unsupported(&e);
                None
            }
        }
    }

    /// Sets an absolute level, clamped to 0-100.
    pub fn set(&mut self, level: i32) -> Result<u8, BrightnessError> {
        if !self.supported {
            return Err(BrightnessError::Unsupported);
        }
        let level = level.clamp(0, MAX_BRIGHTNESS as i32) as u8;
        match self.backend.set(level) {
            Ok(()) => {
                debug!(level, "brightness set");
                self.last_set = Some(level);
                Ok(level)
            }
            Err(e) => {
                self.mark_unsupported(&e);
                Err(e)
            }
        }
    }

    pub fn step_up(&mut self, step: u8) -> Result<u8, BrightnessError> {
        let base = self.base_level()?;
        self.set(base as i32 + step as i32)
    }

    pub fn step_down(&mut self, step: u8) -> Result<u8, BrightnessError> {
        let base = self.base_level()?;
        self.set(base as i32 - step as i32)
    }

    /// The last level this process set, or a fresh query.
    fn base_level(&mut self) -> Result<u8, BrightnessError> {
        match self.last_set {
            Some(level) if self.supported => Ok(level),
            _ => self.current().ok_or(BrightnessError::Unsupported),
        }
    }

    fn mark_unsupported(&mut self, error: &BrightnessError) {
        if self.supported {
            warn!(%error, "brightness control disabled");
        }
        self.supported = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBrightness;

    #[test]
    fn steps_clamp_at_bounds() {
        let panel = FakeBrightness::with_level(95);
        let mut control = BrightnessControl::new(panel.clone());
        assert_eq!(control.step_up(BRIGHTNESS_STEP).unwrap(), 100);
        assert_eq!(control.step_up(BRIGHTNESS_STEP).unwrap(), 100);

        panel.set_level(4);
        let mut control = BrightnessControl::new(panel.clone());
        assert_eq!(control.step_down(BRIGHTNESS_STEP).unwrap(), 0);
        assert_eq!(panel.level(), 0);
    }

    #[test]
    fn stepping_starts_from_last_set_level() {
        let panel = FakeBrightness::with_level(50);
        let mut control = BrightnessControl::new(panel.clone());
        assert_eq!(control.set(30).unwrap(), 30);
        let gets_before = panel.get_calls();
        assert_eq!(control.step_up(BRIGHTNESS_STEP).unwrap(), 40);
        assert_eq!(panel.get_calls(), gets_before);
    }

    #[test]
    fn absolute_set_is_clamped() {
        let panel = FakeBrightness::with_level(50);
        let mut control = BrightnessControl::new(panel.clone());
        assert_eq!(control.set(150).unwrap(), 100);
        assert_eq!(control.set(-5).unwrap(), 0);
    }

    #[test]
    fn failure_is_cached_and_backend_left_alone() {
        let panel = FakeBrightness::unsupported();
        let mut control = BrightnessControl::new(panel.clone());
        assert_eq!(control.current(), None);
        assert!(!control.is_supported());

        let calls = panel.total_calls();
        assert!(matches!(control.step_up(10), Err(BrightnessError::Unsupported)));
        assert!(matches!(control.set(40), Err(BrightnessError::Unsupported)));
        assert_eq!(control.current(), None);
        assert_eq!(panel.total_calls(), calls);
    }
}
