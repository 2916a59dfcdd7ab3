use super::{card, card_header};
use crate::brightness::{BRIGHTNESS_STEP, MAX_BRIGHTNESS};
use crate::coordinator::Coordinator;
use eframe::egui;

/// `draft` holds the slider value while it is dragged, so WMI is only called
/// once on release.
pub fn render_brightness_card(
    ui: &mut egui::Ui,
    coordinator: &mut Coordinator,
    draft: &mut Option<f32>,
) {
    card(ui, |ui| {
        card_header(ui, "Brightness");

        if !coordinator.is_brightness_supported() {
            ui.label(
                egui::RichText::new("Brightness control is not available on this display")
                    .color(ui.visuals().weak_text_color()),
            );
            return;
        }

        let current = coordinator.brightness().unwrap_or(0) as f32;
        let mut value = draft.unwrap_or(current);
        let step = BRIGHTNESS_STEP as i32;

        ui.horizontal(|ui| {
            if ui.button("−").on_hover_text("Darker").clicked() {
                coordinator.step_brightness(-step);
            }

            let response = ui.add(
                egui::Slider::new(&mut value, 0.0..=MAX_BRIGHTNESS as f32)
                    .integer()
                    .suffix("%"),
            );
            if response.dragged() {
                *draft = Some(value);
            } else if response.drag_stopped() || response.changed() {
                *draft = None;
                coordinator.set_brightness(value.round() as i32);
            }

            if ui.button("+").on_hover_text("Brighter").clicked() {
                coordinator.step_brightness(step);
            }
        });
    });
}
