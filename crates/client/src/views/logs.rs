use eframe::egui::{self, RichText, ScrollArea};

use crate::subscriber::EguiLayer;

use super::View;

pub struct LogsPage<'a> {
    pub layer: &'a EguiLayer,
}

impl View for LogsPage<'_> {
    fn ui(self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("{} events", self.layer.len())).weak());
            if ui.button("Clear").clicked() {
                self.layer.clear();
            }
        });

        ui.separator();

        ScrollArea::both()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .max_height(400.0)
            .show(ui, |ui| self.layer.ui(ui));
    }
}
