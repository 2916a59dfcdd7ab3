use super::{card, card_header};
use crate::coordinator::Coordinator;
use crate::hotkey::HotkeyAction;
use eframe::egui;
use tracing::warn;

const BINDING_FIELD_WIDTH: f32 = 170.0;

pub fn render_hotkeys_card(ui: &mut egui::Ui, coordinator: &mut Coordinator) {
    card(ui, |ui| {
        card_header(ui, "Hotkeys");

        let mut rate_enabled = coordinator
            .config()
            .is_hotkey_enabled(HotkeyAction::CycleRefreshRate);
        if ui
            .checkbox(&mut rate_enabled, "Enable refresh rate hotkey")
            .changed()
        {
            coordinator.set_hotkey_enabled(HotkeyAction::CycleRefreshRate, rate_enabled);
        }

        // Both brightness slots share one switch.
        let mut brightness_enabled = coordinator
            .config()
            .is_hotkey_enabled(HotkeyAction::BrightnessUp);
        if ui
            .checkbox(&mut brightness_enabled, "Enable brightness hotkeys")
            .changed()
        {
            coordinator.set_hotkey_enabled(HotkeyAction::BrightnessUp, brightness_enabled);
        }
        ui.add_space(8.0);

        let capturing = coordinator.is_capturing();
        egui::Grid::new("hotkey_grid")
            .num_columns(3)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                for action in HotkeyAction::ALL {
                    ui.label(action.label());

                    let text = coordinator.binding_display_text(action);
                    let enabled = coordinator.config().is_hotkey_enabled(action);
                    let field = egui::RichText::new(text).monospace();
                    ui.add_sized(
                        [BINDING_FIELD_WIDTH, 20.0],
                        egui::Label::new(if enabled { field } else { field.weak() }),
                    );

                    // Only one capture at a time.
                    if ui
                        .add_enabled(!capturing, egui::Button::new("Change"))
                        .on_hover_text("Press a modifier + key combination, Esc to cancel")
                        .clicked()
                    {
                        if let Err(e) = coordinator.begin_capture(action) {
                            warn!(error = %e, "capture not started");
                        }
                    }
                    ui.end_row();
                }
            });
    });
}
