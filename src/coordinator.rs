//! The view-model behind the settings window and the hotkey message window.
//!
//! Owns the settings, the registration table and the capture machine. Every
//! mutation of a binding or an enabled flag ends in `rebuild_registrations`,
//! which drops all OS registrations before re-adding the enabled slots.

use std::sync::mpsc::Sender;

use tracing::{debug, info, warn};

use crate::brightness::{BrightnessBackend, BrightnessControl, BrightnessError, BRIGHTNESS_STEP};
use crate::config::{Config, ConfigStore};
use crate::display::{self, CycleOutcome, DisplayMode, DisplayModes, RefreshRateOption};
use crate::hotkey::{
    CaptureError, CaptureOutcome, HotkeyAction, HotkeyBinding, HotkeyCapture, HotkeyRegistrar,
    HotkeyTable, Key, KeyboardState,
};
use crate::startup::StartupRegistration;

pub const REGISTER_FAILED: &str = "Failed to register hotkey (may be in use by another app)";
pub const INVALID_HOTKEY: &str = "Invalid hotkey (need modifier + key)";
pub const CAPTURE_CANCELLED: &str = "Hotkey capture cancelled";
pub const CAPTURE_PROMPT: &str = "Press keys...";

/// Outcomes pushed to the shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    RefreshRateChanged(u32),
    BrightnessChanged(u8),
    HotkeyPressed(HotkeyAction),
    Status(String),
}

/// The OS seams the coordinator drives.
pub struct Collaborators {
    pub display: Box<dyn DisplayModes>,
    pub brightness: Box<dyn BrightnessBackend>,
    pub registrar: Box<dyn HotkeyRegistrar>,
    pub keyboard: Box<dyn KeyboardState>,
    pub startup: Box<dyn StartupRegistration>,
    pub store: Box<dyn ConfigStore>,
}

pub struct Coordinator {
    display: Box<dyn DisplayModes>,
    brightness: BrightnessControl<Box<dyn BrightnessBackend>>,
    hotkeys: HotkeyTable<Box<dyn HotkeyRegistrar>>,
    keyboard: Box<dyn KeyboardState>,
    startup: Box<dyn StartupRegistration>,
    store: Box<dyn ConfigStore>,
    capture: HotkeyCapture,
    config: Config,
    notifications: Sender<Notification>,

    current_mode: Option<DisplayMode>,
    refresh_rates: Vec<RefreshRateOption>,
    brightness_level: Option<u8>,
    status: String,
}

impl Coordinator {
    pub fn new(collab: Collaborators, notifications: Sender<Notification>) -> Self {
        let mut config = collab.store.load();
        // The registry is the source of truth for the startup entry.
        config.run_at_startup = collab.startup.is_enabled();

        Self {
            display: collab.display,
            brightness: BrightnessControl::new(collab.brightness),
            hotkeys: HotkeyTable::new(collab.registrar),
            keyboard: collab.keyboard,
            startup: collab.startup,
            store: collab.store,
            capture: HotkeyCapture::default(),
            config,
            notifications,
            current_mode: None,
            refresh_rates: Vec::new(),
            brightness_level: None,
            status: String::new(),
        }
    }

    /// Reads display and brightness state and registers the enabled hotkeys.
    pub fn initialize(&mut self) {
        self.refresh_display_info();
        self.brightness_level = self.brightness.current();
        self.rebuild_registrations();
        info!(
            mode = ?self.current_mode,
            brightness = ?self.brightness_level,
            "coordinator initialized"
        );
    }

    pub fn refresh_display_info(&mut self) {
        let mode = match self.display.current_mode() {
            Ok(mode) => mode,
            Err(e) => {
                warn!(error = %e, "display mode query failed");
                self.current_mode = None;
                self.refresh_rates.clear();
                return;
            }
        };
        self.refresh_rates = self
            .display
            .available_refresh_rates(mode.width, mode.height)
            .into_iter()
            .map(|rate| RefreshRateOption {
                rate,
                is_selected: rate == mode.refresh_rate,
                is_included_in_cycle: false,
            })
            .collect();
        self.sync_cycle_inclusion();
        self.current_mode = Some(mode);
    }

    /// Mirrors the persisted cycle list onto the options; an empty list
    /// includes every rate.
    fn sync_cycle_inclusion(&mut self) {
        let included = self.config.cycle_rates();
        for option in &mut self.refresh_rates {
            option.is_included_in_cycle = included.is_empty() || included.contains(&option.rate);
        }
    }

    /// Drops every OS registration, then registers each enabled slot again.
    pub fn rebuild_registrations(&mut self) {
        self.hotkeys.unregister_all();

        let mut all_ok = true;
        for action in HotkeyAction::ALL {
            if !self.config.is_hotkey_enabled(action) {
                continue;
            }
            let binding = self.config.binding(action);
            if !binding.is_valid() {
                debug!(action = ?action, "skipping incomplete binding");
                continue;
            }
            all_ok &= self.hotkeys.register(binding);
        }

        let status = if !all_ok {
            REGISTER_FAILED.to_string()
        } else if self.hotkeys.is_empty() {
            "Hotkeys disabled".to_string()
        } else if self.config.is_hotkey_enabled(HotkeyAction::CycleRefreshRate) {
            format!(
                "Hotkey registered: {}",
                self.config.binding(HotkeyAction::CycleRefreshRate)
            )
        } else {
            "Brightness hotkeys registered".to_string()
        };
        self.set_status(status);
    }

    /// Dispatches a `WM_HOTKEY` id. Unknown ids are ignored.
    pub fn handle_hotkey(&mut self, id: i32) -> Option<HotkeyAction> {
        let Some(action) = self.hotkeys.lookup(id).map(|b| b.action) else {
            debug!(id, "ignoring unknown hotkey id");
            return None;
        };
        self.notify(Notification::HotkeyPressed(action));
        self.execute_action(action);
        Some(action)
    }

    pub fn execute_action(&mut self, action: HotkeyAction) {
        match action {
            HotkeyAction::CycleRefreshRate => self.cycle_refresh_rate(),
            HotkeyAction::BrightnessUp => self.step_brightness(BRIGHTNESS_STEP as i32),
            HotkeyAction::BrightnessDown => self.step_brightness(-(BRIGHTNESS_STEP as i32)),
        }
    }

    pub fn cycle_refresh_rate(&mut self) {
        let included = self.config.cycle_rates();
        match display::cycle_refresh_rate(self.display.as_mut(), &included) {
            Ok(CycleOutcome::Switched { to, .. }) => {
                self.refresh_display_info();
                self.set_status(format!("Refresh rate: {to} Hz"));
                self.notify(Notification::RefreshRateChanged(to));
            }
            Ok(CycleOutcome::Unchanged(rate)) => {
                self.set_status(format!("Nothing to cycle, staying at {rate} Hz"));
            }
            Err(e) => {
                warn!(error = %e, "refresh rate cycle failed");
                self.set_status("Failed to change refresh rate".to_string());
            }
        }
    }

    pub fn set_refresh_rate(&mut self, rate: u32) {
        match self.display.set_refresh_rate(rate) {
            Ok(mode) => {
                info!(%mode, "refresh rate set");
                self.refresh_display_info();
                self.set_status(format!("Refresh rate: {rate} Hz"));
                self.notify(Notification::RefreshRateChanged(rate));
            }
            Err(e) => {
                warn!(rate, error = %e, "refresh rate change failed");
                self.set_status(format!("Failed to set {rate} Hz"));
            }
        }
    }

    /// Toggles one rate's membership in the cycle and persists the list.
    pub fn set_cycle_included(&mut self, rate: u32, included: bool) {
        let Some(option) = self.refresh_rates.iter_mut().find(|o| o.rate == rate) else {
            return;
        };
        option.is_included_in_cycle = included;
        let rates: Vec<u32> = self
            .refresh_rates
            .iter()
            .filter(|o| o.is_included_in_cycle)
            .map(|o| o.rate)
            .collect();
        self.config.set_cycle_rates(rates);
        self.sync_cycle_inclusion();
        self.save();
    }

    pub fn set_brightness(&mut self, level: i32) {
        let result = self.brightness.set(level);
        self.apply_brightness_result(result);
    }

    /// Moves brightness by `delta` points from the last known level.
    pub fn step_brightness(&mut self, delta: i32) {
        let step = delta.unsigned_abs().min(u8::MAX as u32) as u8;
        let result = if delta >= 0 {
            self.brightness.step_up(step)
        } else {
            self.brightness.step_down(step)
        };
        self.apply_brightness_result(result);
    }

    fn apply_brightness_result(&mut self, result: Result<u8, BrightnessError>) {
        match result {
            Ok(level) => {
                self.brightness_level = Some(level);
                self.notify(Notification::BrightnessChanged(level));
            }
            Err(e) => {
                self.brightness_level = None;
                self.set_status(format!("Brightness unavailable: {e}"));
            }
        }
    }

    /// Enters capture for one slot. Live registrations are dropped so the
    /// chord reaches the window instead of firing.
    pub fn begin_capture(&mut self, action: HotkeyAction) -> Result<(), CaptureError> {
        self.capture.begin(action)?;
        self.hotkeys.unregister_all();
        info!(action = ?action, "hotkey capture started");
        self.set_status(format!("{CAPTURE_PROMPT} (Esc to cancel)"));
        Ok(())
    }

    /// Feeds a key-down from the window. Returns whether the key was consumed.
    pub fn capture_key(&mut self, key: Key) -> bool {
        let live = self.keyboard.live_modifiers();
        let outcome = self.capture.key_down(key, live);
        let handled = outcome.is_handled();

        match outcome {
            CaptureOutcome::Ignored | CaptureOutcome::Pending => {}
            CaptureOutcome::Accepted(binding) => {
                info!(chord = %binding, "hotkey captured");
                self.config.set_binding(&binding);
                self.save();
                self.rebuild_registrations();
            }
            CaptureOutcome::Rejected { target } => {
                debug!(action = ?target, key = %key, "capture rejected");
                self.rebuild_registrations();
                self.set_status(INVALID_HOTKEY.to_string());
            }
            CaptureOutcome::Cancelled { target } => {
                debug!(action = ?target, "capture cancelled");
                self.rebuild_registrations();
                self.set_status(CAPTURE_CANCELLED.to_string());
            }
        }
        handled
    }

    /// Leaves capture without a key, e.g. when the window is hidden.
    pub fn abort_capture(&mut self) {
        if self.capture.abort().is_some() {
            self.rebuild_registrations();
        }
    }

    pub fn set_hotkey_enabled(&mut self, action: HotkeyAction, enabled: bool) {
        if self.config.is_hotkey_enabled(action) == enabled {
            return;
        }
        self.config.set_hotkey_enabled(action, enabled);
        self.save();
        if !self.capture.is_capturing() {
            self.rebuild_registrations();
        }
    }

    pub fn set_dark_mode(&mut self, dark: bool) {
        self.config.is_dark_mode = dark;
        self.save();
    }

    pub fn set_minimize_to_tray(&mut self, enabled: bool) {
        self.config.minimize_to_tray_on_close = enabled;
        self.save();
    }

    pub fn set_run_at_startup(&mut self, enabled: bool) {
        self.startup.set_enabled(enabled);
        self.config.run_at_startup = self.startup.is_enabled();
        self.save();
    }

    /// Text for a slot's binding field; a prompt while that slot is captured.
    pub fn binding_display_text(&self, action: HotkeyAction) -> String {
        if self.capture.target() == Some(action) {
            CAPTURE_PROMPT.to_string()
        } else {
            self.config.binding(action).to_string()
        }
    }

    pub fn binding(&self, action: HotkeyAction) -> HotkeyBinding {
        self.config.binding(action)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn current_mode(&self) -> Option<DisplayMode> {
        self.current_mode
    }

    pub fn refresh_rates(&self) -> &[RefreshRateOption] {
        &self.refresh_rates
    }

    pub fn brightness(&self) -> Option<u8> {
        self.brightness_level
    }

    pub fn is_brightness_supported(&self) -> bool {
        self.brightness.is_supported()
    }

    pub fn is_capturing(&self) -> bool {
        self.capture.is_capturing()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Releases every OS registration and writes the settings.
    pub fn shutdown(&mut self) {
        self.capture.abort();
        self.hotkeys.unregister_all();
        self.save();
        info!("coordinator shut down");
    }

    fn save(&self) {
        if let Err(e) = self.store.save(&self.config) {
            warn!(error = %e, "settings not saved");
        }
    }

    fn set_status(&mut self, status: String) {
        debug!(%status, "status");
        self.status = status.clone();
        self.notify(Notification::Status(status));
    }

    fn notify(&self, notification: Notification) {
        // The shell may already be gone during shutdown.
        let _ = self.notifications.send(notification);
    }
}
