use super::{card, card_header};
use crate::coordinator::Coordinator;
use eframe::egui;

pub fn render_general_card(ui: &mut egui::Ui, coordinator: &mut Coordinator) {
    card(ui, |ui| {
        card_header(ui, "Settings");

        let config = coordinator.config();
        let mut dark = config.is_dark_mode;
        let mut to_tray = config.minimize_to_tray_on_close;
        let mut startup = config.run_at_startup;

        if ui.checkbox(&mut dark, "Dark mode").changed() {
            coordinator.set_dark_mode(dark);
        }
        if ui
            .checkbox(&mut to_tray, "Minimize to tray on close")
            .changed()
        {
            coordinator.set_minimize_to_tray(to_tray);
        }
        if ui
            .checkbox(&mut startup, "Run at startup")
            .on_hover_text("Starts minimized in the tray after you sign in")
            .changed()
        {
            coordinator.set_run_at_startup(startup);
        }
    });
}
