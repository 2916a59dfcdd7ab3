//! Content and dismiss timing for the on-screen display.

use std::time::{Duration, Instant};

use crate::coordinator::Notification;

/// How long an overlay stays up after the latest show.
pub const OSD_DURATION: Duration = Duration::from_secs(2);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OsdContent {
    RefreshRate(u32),
    Brightness(u8),
}

impl OsdContent {
    pub fn caption(&self) -> &'static str {
        match self {
            OsdContent::RefreshRate(_) => "Refresh rate",
            OsdContent::Brightness(_) => "Brightness",
        }
    }

    pub fn headline(&self) -> String {
        match self {
            OsdContent::RefreshRate(rate) => format!("{rate} Hz"),
            OsdContent::Brightness(level) => format!("{}%", (*level).min(100)),
        }
    }

    /// Fill of the level bar, brightness only.
    pub fn bar_fraction(&self) -> Option<f32> {
        match self {
            OsdContent::RefreshRate(_) => None,
            OsdContent::Brightness(level) => Some(f32::from((*level).min(100)) / 100.0),
        }
    }
}

/// What a drained batch of notifications puts on screen. Only rate and
/// brightness changes that follow a hotkey press in the same batch count;
/// the latest one wins. A press with no change behind it arms nothing for
/// the next batch.
pub fn osd_for_batch(batch: impl IntoIterator<Item = Notification>) -> Option<OsdContent> {
    let mut armed = false;
    let mut shown = None;
    for notification in batch {
        let content = match notification {
            Notification::HotkeyPressed(_) => {
                armed = true;
                continue;
            }
            Notification::RefreshRateChanged(rate) => OsdContent::RefreshRate(rate),
            Notification::BrightnessChanged(level) => OsdContent::Brightness(level),
            Notification::Status(_) => continue,
        };
        if std::mem::take(&mut armed) {
            shown = Some(content);
        }
    }
    shown
}

/// One-shot dismiss deadline, restarted by every show.
#[derive(Debug, Default)]
pub struct OsdTimer {
    deadline: Option<Instant>,
}

impl OsdTimer {
    pub fn show(&mut self, now: Instant) {
        self.deadline = Some(now + OSD_DURATION);
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|d| now < d)
    }

    /// Time left before dismissal, `None` once hidden.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .and_then(|d| d.checked_duration_since(now))
            .filter(|left| !left.is_zero())
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_for_exactly_the_duration() {
        let start = Instant::now();
        let mut timer = OsdTimer::default();
        assert!(!timer.is_visible(start));

        timer.show(start);
        assert!(timer.is_visible(start));
        assert!(timer.is_visible(start + OSD_DURATION - Duration::from_millis(1)));
        assert!(!timer.is_visible(start + OSD_DURATION));
        assert_eq!(timer.remaining(start), Some(OSD_DURATION));
        assert_eq!(timer.remaining(start + OSD_DURATION), None);
    }

    #[test]
    fn show_restarts_the_countdown() {
        let start = Instant::now();
        let mut timer = OsdTimer::default();
        timer.show(start);
        let later = start + Duration::from_millis(1500);
        timer.show(later);
        assert!(timer.is_visible(start + OSD_DURATION + Duration::from_millis(100)));
        assert_eq!(timer.remaining(later), Some(OSD_DURATION));
    }

    #[test]
    fn cancel_hides_immediately() {
        let start = Instant::now();
        let mut timer = OsdTimer::default();
        timer.show(start);
        timer.cancel();
        assert!(!timer.is_visible(start));
        assert_eq!(timer.remaining(start), None);
    }

    #[test]
    fn only_hotkey_changes_reach_the_screen() {
        use crate::hotkey::HotkeyAction;

        assert_eq!(osd_for_batch([Notification::BrightnessChanged(40)]), None);
        assert_eq!(
            osd_for_batch([
                Notification::HotkeyPressed(HotkeyAction::CycleRefreshRate),
                Notification::Status("Refresh rate: 120 Hz".into()),
                Notification::RefreshRateChanged(120),
            ]),
            Some(OsdContent::RefreshRate(120))
        );
        // One press echoes one change.
        assert_eq!(
            osd_for_batch([
                Notification::HotkeyPressed(HotkeyAction::BrightnessUp),
                Notification::BrightnessChanged(60),
                Notification::RefreshRateChanged(144),
            ]),
            Some(OsdContent::Brightness(60))
        );
    }

    #[test]
    fn press_without_change_does_not_carry_over() {
        use crate::hotkey::HotkeyAction;

        let nothing_to_cycle = [
            Notification::HotkeyPressed(HotkeyAction::CycleRefreshRate),
            Notification::Status("Nothing to cycle, staying at 60 Hz".into()),
        ];
        assert_eq!(osd_for_batch(nothing_to_cycle), None);
        assert_eq!(osd_for_batch([Notification::RefreshRateChanged(120)]), None);
    }

    #[test]
    fn content_text() {
        assert_eq!(OsdContent::RefreshRate(144).headline(), "144 Hz");
        assert_eq!(OsdContent::Brightness(70).headline(), "70%");
        assert_eq!(OsdContent::Brightness(70).bar_fraction(), Some(0.7));
        assert_eq!(OsdContent::RefreshRate(60).bar_fraction(), None);
    }
}
