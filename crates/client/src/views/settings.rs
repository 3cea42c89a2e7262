use catdash_core::{
    config::{default_pixels_per_point_value, Settings},
    paths::DataPaths,
    API_URL_ENV,
};
use eframe::egui::{self, RichText};

use crate::{errors_pool::ErrorPoolExt, states::SettingsState, toasts, ui_ext::UiExt};

use super::View;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

pub struct SettingsPage<'a> {
    pub state: &'a mut SettingsState,
    pub paths: &'a DataPaths,
}

impl View for SettingsPage<'_> {
    fn ui(self, ui: &mut egui::Ui) {
        let draft = &mut self.state.draft;

        egui::Grid::new("settings_grid")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label("API URL");
                ui.add(egui::TextEdit::singleline(&mut draft.api_url).desired_width(260.0));
                ui.end_row();

                ui.label("Request timeout (s)");
                ui.add(egui::DragValue::new(&mut draft.request_timeout_secs).range(1..=300));
                ui.end_row();

                ui.label("Log level");
                egui::ComboBox::from_id_source("settings_log_level")
                    .selected_text(draft.log_level.as_str())
                    .show_ui(ui, |ui| {
                        for level in LOG_LEVELS {
                            ui.selectable_value(&mut draft.log_level, level.to_owned(), level);
                        }
                    });
                ui.end_row();

                ui.label("Scale");
                ui.horizontal(|ui| {
                    ui.add(egui::Slider::new(&mut draft.pixels_per_point, 0.5..=3.0).step_by(0.05));
                    if ui.button("Reset").clicked() {
                        draft.pixels_per_point = default_pixels_per_point_value();
                    }
                });
                ui.end_row();
            });

        if let Some(url) = Settings::env_api_url() {
            ui.warn_label(format!("{API_URL_ENV} is set, {url} is used instead"));
        }

        if self.state.requires_restart() {
            ui.warn_label("Restart Catdash to apply the API and logging changes");
        }

        ui.add_space(8.0);

        ui.horizontal(|ui| {
            let is_dirty = self.state.is_dirty();

            if ui.add_enabled(is_dirty, egui::Button::new("Save")).clicked() {
                let restart = self.state.requires_restart();
                let saved = self.state.draft.save(self.paths.settings()).report_error();

                if saved.is_some() {
                    self.state.saved = self.state.draft.clone();
                    if restart {
                        toasts::info("Settings saved, restart to apply them");
                    } else {
                        toasts::success("Settings saved");
                    }
                }
            }

            if ui.add_enabled(is_dirty, egui::Button::new("Discard")).clicked() {
                self.state.draft = self.state.saved.clone();
            }
        });

        ui.label(RichText::new(self.paths.settings().display().to_string()).weak().small());
    }
}
