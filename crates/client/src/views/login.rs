use catdash_core::{forms::LoginForm, service::AuthService};
use eframe::egui::{self, RichText};
use egui_form::{garde::field_path, Form, FormField};
use garde::Validate;

use crate::{
    pages::{Page, Router},
    requests,
    states::LoginState,
    task::{TaskKind, Tasks},
    ui_ext::UiExt,
};

use super::View;

pub struct LoginPage<'a> {
    pub state: &'a mut LoginState,
    pub tasks: &'a mut Tasks,
    pub auth: &'a AuthService,
    pub router: &'a mut Router,
}

impl View for LoginPage<'_> {
    fn ui(self, ui: &mut egui::Ui) {
        let is_pending = self.tasks.is_pending(TaskKind::Login);

        ui.centered_card(320.0, |ui| {
            ui.heading(RichText::new("Login").strong());
            ui.add_space(8.0);

            let data = self.state.form.clone();
            let mut form = Form::new().add_report(egui_form::garde::GardeReport::new(data.validate(&())));

            FormField::new(&mut form, field_path!("email"))
                .label("Email")
                .ui(
                    ui,
                    egui::TextEdit::singleline(&mut self.state.form.email).hint_text("you@example.com"),
                );

            FormField::new(&mut form, field_path!("password"))
                .label("Password")
                .ui(ui, egui::TextEdit::singleline(&mut self.state.form.password).password(true));

            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let submit = ui.add_enabled(!is_pending, egui::Button::new("Login"));
                if let Some(Ok(())) = form.handle_submit(&submit, ui) {
                    requests::login(self.tasks, self.auth, LoginForm::new(data.email.trim(), data.password));
                }

                if is_pending {
                    ui.spinner();
                }
            });

            ui.separator();

            ui.horizontal(|ui| {
                ui.label("No account yet?");
                if ui.link("Register").clicked() {
                    self.router.navigate(Page::Register, false);
                }
            });
        });
    }
}
