use super::types::{SettingsApp, RESTORE_SIGNAL};
use crate::RESTORE_EVENT_NAME;
use eframe::egui;
use std::sync::atomic::Ordering;
use windows::Win32::Foundation::CloseHandle;
use windows::Win32::System::Threading::*;

/// Asks the running instance to show its window. Returns false when no
/// instance is listening.
pub fn signal_restore_window() -> bool {
    RESTORE_SIGNAL.store(true, Ordering::SeqCst);
    unsafe {
        match OpenEventW(EVENT_ALL_ACCESS, false, RESTORE_EVENT_NAME) {
            Ok(event) => {
                let signalled = SetEvent(event).is_ok();
                let _ = CloseHandle(event);
                signalled
            }
            Err(_) => false,
        }
    }
}

impl SettingsApp {
    pub(crate) fn restore_window(&self, ctx: &egui::Context) {
        ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
        ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(false));
        ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
        ctx.send_viewport_cmd(egui::ViewportCommand::WindowLevel(
            egui::WindowLevel::AlwaysOnTop,
        ));
        ctx.send_viewport_cmd(egui::ViewportCommand::WindowLevel(
            egui::WindowLevel::Normal,
        ));
        ctx.request_repaint();
    }
}
