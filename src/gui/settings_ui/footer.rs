use eframe::egui;

pub fn render_footer(ui: &mut egui::Ui, status: &str) {
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new(status)
                .size(11.0)
                .color(ui.visuals().weak_text_color()),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(
                egui::RichText::new(format!("v{}", env!("CARGO_PKG_VERSION")))
                    .size(11.0)
                    .color(ui.visuals().weak_text_color()),
            );
        });
    });
}
