use super::types::SettingsApp;
use crate::gui::settings_ui::{
    render_brightness_card, render_display_card, render_footer, render_general_card,
    render_hotkeys_card,
};
use eframe::egui;

impl SettingsApp {
    pub(crate) fn render_footer(&mut self, ctx: &egui::Context) {
        let visuals = ctx.style().visuals.clone();
        let footer_bg = if visuals.dark_mode {
            egui::Color32::from_gray(20)
        } else {
            egui::Color32::from_gray(240)
        };

        let runtime = self.runtime.borrow();
        egui::TopBottomPanel::bottom("footer_panel")
            .resizable(false)
            .show_separator_line(false)
            .frame(
                egui::Frame::default()
                    .inner_margin(egui::Margin::symmetric(10, 4))
                    .fill(footer_bg),
            )
            .show(ctx, |ui| {
                render_footer(ui, runtime.coordinator.status());
            });
    }

    pub(crate) fn render_main_layout(&mut self, ctx: &egui::Context) {
        let mut runtime = self.runtime.borrow_mut();
        let coordinator = &mut runtime.coordinator;
        let draft = &mut self.brightness_draft;

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    ui.add_space(5.0);
                    render_display_card(ui, coordinator);
                    ui.add_space(10.0);
                    render_brightness_card(ui, coordinator, draft);
                    ui.add_space(10.0);
                    render_hotkeys_card(ui, coordinator);
                    ui.add_space(10.0);
                    render_general_card(ui, coordinator);
                });
        });
    }
}
