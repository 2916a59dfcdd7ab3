mod init;
mod logic;
mod rendering;
mod types;
mod utils;

pub use types::SettingsApp;
pub use utils::signal_restore_window;

use eframe::egui;

impl eframe::App for SettingsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Theme & Tray
        self.update_theme_and_tray(ctx);

        // Startup Logic
        self.update_startup(ctx);

        // Restore Signal
        self.check_restore_signal(ctx);

        // Hotkey Capture (before any widget consumes key events)
        self.update_hotkey_capture(ctx);

        // Coordinator notifications
        self.handle_notifications(ctx);

        // Close Request
        self.handle_close_request(ctx);

        // --- UI LAYOUT ---
        self.render_footer(ctx);
        self.render_main_layout(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.tray_icon = None;
        self.runtime.borrow_mut().coordinator.shutdown();
    }
}
