//! The transient "press the new chord" mode used to redefine a binding.

use thiserror::Error;

use super::binding::{HotkeyAction, HotkeyBinding};
use super::keys::{Key, Modifiers};

/// Source of the modifier state the OS currently sees as held.
pub trait KeyboardState {
    fn live_modifiers(&self) -> Modifiers;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CaptureState {
    #[default]
    Idle,
    Capturing {
        target: HotkeyAction,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CaptureError {
    #[error("already capturing a hotkey for {0:?}")]
    AlreadyCapturing(HotkeyAction),
}

/// Result of feeding one key-down event to the machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Not capturing; the event belongs to someone else.
    Ignored,
    /// A modifier went down; still waiting for the real key.
    Pending,
    Accepted(HotkeyBinding),
    /// Bare key or no key: the previous binding stays.
    Rejected { target: HotkeyAction },
    Cancelled { target: HotkeyAction },
}

impl CaptureOutcome {
    /// Whether the key event was consumed by the capture.
    pub fn is_handled(&self) -> bool {
        !matches!(self, CaptureOutcome::Ignored)
    }
}

#[derive(Debug, Default)]
pub struct HotkeyCapture {
    state: CaptureState,
}

impl HotkeyCapture {
    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.state, CaptureState::Capturing { .. })
    }

    pub fn target(&self) -> Option<HotkeyAction> {
        match self.state {
            CaptureState::Capturing { target } => Some(target),
            CaptureState::Idle => None,
        }
    }

    pub fn begin(&mut self, target: HotkeyAction) -> Result<(), CaptureError> {
        if let CaptureState::Capturing { target: current } = self.state {
            return Err(CaptureError::AlreadyCapturing(current));
        }
        self.state = CaptureState::Capturing { target };
        Ok(())
    }

    /// Feeds a key-down. `live` is the modifier state read from the OS at the
    /// time of the event, not the modifiers carried by the event itself.
    pub fn key_down(&mut self, key: Key, live: Modifiers) -> CaptureOutcome {
        let CaptureState::Capturing { target } = self.state else {
            return CaptureOutcome::Ignored;
        };

        if key.is_modifier() {
            return CaptureOutcome::Pending;
        }

        self.state = CaptureState::Idle;

        if key == Key::Escape {
            return CaptureOutcome::Cancelled { target };
        }

        let binding = HotkeyBinding::new(target, live, key);
        if binding.is_valid() {
            CaptureOutcome::Accepted(binding)
        } else {
            CaptureOutcome::Rejected { target }
        }
    }

    /// Leaves capture without a key, e.g. when the window closes.
    pub fn abort(&mut self) -> Option<HotkeyAction> {
        let target = self.target();
        self.state = CaptureState::Idle;
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_keep_capture_open() {
        let mut capture = HotkeyCapture::default();
        capture.begin(HotkeyAction::CycleRefreshRate).unwrap();

        assert_eq!(
            capture.key_down(Key::LeftCtrl, Modifiers::CONTROL),
            CaptureOutcome::Pending
        );
        assert_eq!(
            capture.key_down(Key::RightShift, Modifiers::CONTROL | Modifiers::SHIFT),
            CaptureOutcome::Pending
        );
        assert!(capture.is_capturing());

        let outcome = capture.key_down(Key::R, Modifiers::CONTROL | Modifiers::SHIFT);
        assert_eq!(
            outcome,
            CaptureOutcome::Accepted(HotkeyBinding::new(
                HotkeyAction::CycleRefreshRate,
                Modifiers::CONTROL | Modifiers::SHIFT,
                Key::R
            ))
        );
        assert_eq!(capture.state(), CaptureState::Idle);
    }

    #[test]
    fn bare_key_is_rejected() {
        let mut capture = HotkeyCapture::default();
        capture.begin(HotkeyAction::BrightnessUp).unwrap();
        assert_eq!(
            capture.key_down(Key::R, Modifiers::NONE),
            CaptureOutcome::Rejected {
                target: HotkeyAction::BrightnessUp
            }
        );
        assert!(!capture.is_capturing());
    }

    #[test]
    fn escape_cancels_even_with_modifiers_held() {
        let mut capture = HotkeyCapture::default();
        capture.begin(HotkeyAction::BrightnessDown).unwrap();
        assert_eq!(
            capture.key_down(Key::Escape, Modifiers::CONTROL),
            CaptureOutcome::Cancelled {
                target: HotkeyAction::BrightnessDown
            }
        );
    }

    #[test]
    fn keys_are_ignored_while_idle() {
        let mut capture = HotkeyCapture::default();
        let outcome = capture.key_down(Key::R, Modifiers::CONTROL);
        assert_eq!(outcome, CaptureOutcome::Ignored);
        assert!(!outcome.is_handled());
    }

    #[test]
    fn second_begin_is_refused() {
        let mut capture = HotkeyCapture::default();
        capture.begin(HotkeyAction::BrightnessUp).unwrap();
        assert_eq!(
            capture.begin(HotkeyAction::CycleRefreshRate),
            Err(CaptureError::AlreadyCapturing(HotkeyAction::BrightnessUp))
        );
        assert_eq!(capture.target(), Some(HotkeyAction::BrightnessUp));
    }

    #[test]
    fn abort_returns_to_idle() {
        let mut capture = HotkeyCapture::default();
        assert_eq!(capture.abort(), None);
        capture.begin(HotkeyAction::CycleRefreshRate).unwrap();
        assert_eq!(capture.abort(), Some(HotkeyAction::CycleRefreshRate));
        assert!(!capture.is_capturing());
    }
}
