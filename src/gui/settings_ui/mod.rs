mod brightness;
mod display;
mod footer;
mod general;
mod hotkeys;

pub use brightness::render_brightness_card;
pub use display::render_display_card;
pub use footer::render_footer;
pub use general::render_general_card;
pub use hotkeys::render_hotkeys_card;

use eframe::egui;

/// Rounded panel every settings section sits in.
pub(crate) fn card<R>(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> R {
    let is_dark = ui.visuals().dark_mode;
    let card_bg = if is_dark {
        egui::Color32::from_rgba_unmultiplied(28, 32, 42, 250)
    } else {
        egui::Color32::from_rgba_unmultiplied(255, 255, 255, 255)
    };
    let card_stroke = if is_dark {
        egui::Stroke::new(1.0, egui::Color32::from_gray(50))
    } else {
        egui::Stroke::new(1.0, egui::Color32::from_gray(210))
    };

    egui::Frame::new()
        .fill(card_bg)
        .stroke(card_stroke)
        .inner_margin(12.0)
        .corner_radius(10.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add_contents(ui)
        })
        .inner
}

pub(crate) fn card_header(ui: &mut egui::Ui, title: &str) {
    ui.label(egui::RichText::new(title).strong().size(14.0));
    ui.add_space(6.0);
}
