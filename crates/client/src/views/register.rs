use catdash_core::service::AuthService;
use eframe::egui::{self, RichText};
use egui_form::{garde::field_path, Form, FormField};
use garde::Validate;

use crate::{
    pages::{Page, Router},
    requests,
    states::RegisterState,
    task::{TaskKind, Tasks},
    ui_ext::UiExt,
};

use super::View;

pub struct RegisterPage<'a> {
    pub state: &'a mut RegisterState,
    pub tasks: &'a mut Tasks,
    pub auth: &'a AuthService,
    pub router: &'a mut Router,
}

impl View for RegisterPage<'_> {
    fn ui(self, ui: &mut egui::Ui) {
        let is_pending = self.tasks.is_pending(TaskKind::Register);

        ui.centered_card(320.0, |ui| {
            ui.heading(RichText::new("Register").strong());
            ui.add_space(8.0);

            if self.state.created {
                ui.label("Your account has been created!");
                if ui.button("Register another account").clicked() {
                    self.state.created = false;
                }
            } else {
                let data = self.state.form.clone();
                let mut form = Form::new().add_report(egui_form::garde::GardeReport::new(data.validate(&())));

                FormField::new(&mut form, field_path!("name"))
                    .label("Name")
                    .ui(ui, egui::TextEdit::singleline(&mut self.state.form.name));

                FormField::new(&mut form, field_path!("email"))
                    .label("Email")
                    .ui(ui, egui::TextEdit::singleline(&mut self.state.form.email));

                FormField::new(&mut form, field_path!("password"))
                    .label("Password")
                    .ui(ui, egui::TextEdit::singleline(&mut self.state.form.password).password(true));

                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    let submit = ui.add_enabled(!is_pending, egui::Button::new("Register"));
                    if let Some(Ok(())) = form.handle_submit(&submit, ui) {
                        requests::register(self.tasks, self.auth, data);
                    }

                    if is_pending {
                        ui.spinner();
                    }
                });
            }

            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Already registered?");
                if ui.link("Login").clicked() {
                    self.router.navigate(Page::Login, false);
                }
            });
        });
    }
}
