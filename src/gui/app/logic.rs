use super::init::build_tray_icon;
use super::types::{Runtime, SettingsApp, RESTORE_SIGNAL};
use crate::coordinator::Notification;
use crate::gui::key_mapping::{captured_key, egui_key_to_key};
use crate::icon_gen;
use crate::overlay::osd_for_batch;
use eframe::egui;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::debug;

impl Runtime {
    /// Drains coordinator notifications. Rate and brightness changes that
    /// follow a hotkey press are echoed on the OSD; the window already shows
    /// changes made from it. Returns whether anything arrived.
    pub(crate) fn pump_notifications(&mut self) -> bool {
        let batch: Vec<Notification> = self.notifications.try_iter().collect();
        if batch.is_empty() {
            return false;
        }
        debug!(count = batch.len(), "notifications");
        if let (Some(content), Some(osd)) = (osd_for_batch(batch), &self.osd) {
            osd.show(content);
        }
        true
    }
}

impl SettingsApp {
    pub(crate) fn update_theme_and_tray(&mut self, ctx: &egui::Context) {
        let now = ctx.input(|i| i.time);

        // Taskbar theme only picks the tray glyph color.
        if now - self.theme_check_timer > 1.0 {
            self.theme_check_timer = now;
            let system_dark = crate::gui::utils::is_system_in_dark_mode();
            if system_dark != self.last_system_theme_dark {
                self.last_system_theme_dark = system_dark;
                if let (Some(tray), Some(icon)) =
                    (&mut self.tray_icon, icon_gen::get_tray_icon(system_dark))
                {
                    let _ = tray.set_icon(Some(icon));
                }
            }
        }

        let dark = self.runtime.borrow().coordinator.config().is_dark_mode;
        if dark != self.last_dark_mode {
            self.last_dark_mode = dark;
            apply_theme(ctx, dark);
            if let Some(osd) = &self.runtime.borrow().osd {
                osd.set_dark(dark);
            }
        }

        // --- LAZY TRAY ICON RECONCILE ---
        if self.tray_icon.is_none() && now - self.tray_retry_timer > 1.0 {
            self.tray_retry_timer = now;
            self.tray_icon = build_tray_icon(&self.tray_menu, self.last_system_theme_dark);
        }
    }

    /// First frame: the window was created hidden; show it unless the app
    /// was launched into the tray.
    pub(crate) fn update_startup(&mut self, ctx: &egui::Context) {
        if self.startup_done {
            return;
        }
        self.startup_done = true;
        apply_theme(ctx, self.last_dark_mode);
        if !self.start_minimized {
            self.restore_window(ctx);
        }
    }

    pub(crate) fn check_restore_signal(&mut self, ctx: &egui::Context) {
        if RESTORE_SIGNAL.swap(false, Ordering::SeqCst) {
            self.restore_window(ctx);
        }
    }

    /// While a slot is being captured, key presses belong to the capture and
    /// are removed before any widget sees them.
    pub(crate) fn update_hotkey_capture(&mut self, ctx: &egui::Context) {
        if !self.runtime.borrow().coordinator.is_capturing() {
            return;
        }

        let mut pressed = Vec::new();
        ctx.input_mut(|i| {
            i.events.retain(|event| {
                if let Some(key) = captured_key(event) {
                    pressed.push(key);
                    return false;
                }
                !matches!(event, egui::Event::Key { .. } | egui::Event::Text(_))
            });
        });

        let mut rt = self.runtime.borrow_mut();
        for key in pressed {
            let Some(key) = egui_key_to_key(&key) else {
                debug!(?key, "key has no hotkey equivalent");
                continue;
            };
            rt.coordinator.capture_key(key);
            if !rt.coordinator.is_capturing() {
                break;
            }
        }
    }

    pub(crate) fn handle_notifications(&mut self, ctx: &egui::Context) {
        if self.runtime.borrow_mut().pump_notifications() {
            ctx.request_repaint();
        }
    }

    pub(crate) fn handle_close_request(&mut self, ctx: &egui::Context) {
        let (close_requested, minimized) =
            ctx.input(|i| (i.viewport().close_requested(), i.viewport().minimized));
        let to_tray = self
            .runtime
            .borrow()
            .coordinator
            .config()
            .minimize_to_tray_on_close;

        if close_requested && !self.is_quitting {
            if to_tray {
                ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
                self.hide_to_tray(ctx);
            } else {
                self.is_quitting = true;
            }
        } else if minimized == Some(true) && to_tray {
            self.hide_to_tray(ctx);
        }
    }

    fn hide_to_tray(&mut self, ctx: &egui::Context) {
        self.brightness_draft = None;
        self.runtime.borrow_mut().coordinator.abort_capture();
        ctx.send_viewport_cmd(egui::ViewportCommand::Visible(false));
    }
}

fn apply_theme(ctx: &egui::Context, dark: bool) {
    if dark {
        ctx.set_visuals(egui::Visuals::dark());
    } else {
        ctx.set_visuals(egui::Visuals::light());
    }
    ctx.send_viewport_cmd(egui::ViewportCommand::Icon(Some(Arc::new(
        icon_gen::get_window_icon(dark),
    ))));
}
