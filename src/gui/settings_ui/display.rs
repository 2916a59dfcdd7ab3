use super::{card, card_header};
use crate::coordinator::Coordinator;
use eframe::egui;

pub fn render_display_card(ui: &mut egui::Ui, coordinator: &mut Coordinator) {
    card(ui, |ui| {
        ui.horizontal(|ui| {
            card_header(ui, "Display");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .small_button("⟳")
                    .on_hover_text("Re-read display modes")
                    .clicked()
                {
                    coordinator.refresh_display_info();
                }
            });
        });

        let Some(mode) = coordinator.current_mode() else {
            ui.label(
                egui::RichText::new("Could not read the current display mode")
                    .color(ui.visuals().warn_fg_color),
            );
            return;
        };
        ui.label(egui::RichText::new(mode.to_string()).size(12.0).weak());
        ui.add_space(6.0);

        // Copy out so the buttons can mutate the coordinator.
        let options = coordinator.refresh_rates().to_vec();

        ui.horizontal_wrapped(|ui| {
            for option in &options {
                let text = egui::RichText::new(option.display_text()).strong();
                if ui
                    .add(
                        egui::Button::new(text)
                            .selected(option.is_selected)
                            .corner_radius(6.0),
                    )
                    .on_hover_cursor(egui::CursorIcon::PointingHand)
                    .clicked()
                    && !option.is_selected
                {
                    coordinator.set_refresh_rate(option.rate);
                }
            }
        });

        if options.len() > 1 {
            ui.add_space(8.0);
            ui.label("Include in hotkey cycle:");
            ui.horizontal_wrapped(|ui| {
                for option in &options {
                    let mut included = option.is_included_in_cycle;
                    if ui
                        .checkbox(&mut included, option.display_text())
                        .changed()
                    {
                        coordinator.set_cycle_included(option.rate, included);
                    }
                }
            });
        }
    });
}
