use eframe::egui::{self, Response, RichText, Ui};

pub trait UiExt {
    fn ui_mut(&mut self) -> &mut Ui;

    fn error_label(&mut self, text: impl Into<String>) -> Response {
        let ui = self.ui_mut();
        ui.label(RichText::new(text).color(ui.visuals().error_fg_color))
    }

    fn warn_label(&mut self, text: impl Into<String>) -> Response {
        let ui = self.ui_mut();
        ui.label(RichText::new(text).color(ui.visuals().warn_fg_color))
    }

    /// Narrow column in the middle of the page, used by the auth forms.
    fn centered_card<R>(&mut self, width: f32, add_contents: impl FnOnce(&mut Ui) -> R) -> R {
        let ui = self.ui_mut();
        let margin = ((ui.available_width() - width) / 2.0).max(0.0);

        ui.horizontal(|ui| {
            ui.add_space(margin);
            egui::Frame::group(ui.style())
                .inner_margin(16.0)
                .show(ui, |ui| {
                    ui.set_width(width);
                    ui.vertical(add_contents).inner
                })
                .inner
        })
        .inner
    }
}

impl UiExt for Ui {
    #[inline]
    fn ui_mut(&mut self) -> &mut Ui {
        self
    }
}
