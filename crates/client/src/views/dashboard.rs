use std::time::Instant;

use catdash_core::{
    api::category::CategoryId,
    dashboard::{Dashboard, EditDialog, Filter},
    forms::CategoryForm,
    service::CategoryService,
};
use eframe::egui::{self, Align2, Color32, RichText};
use egui_extras::{Column, TableBuilder};

use crate::{
    popup::confirm_popup,
    requests,
    task::{TaskKind, Tasks},
    ui_ext::UiExt,
};

use super::View;

pub struct DashboardPage<'a> {
    pub dashboard: &'a mut Dashboard,
    pub tasks: &'a mut Tasks,
    pub categories: &'a CategoryService,
    pub logout_requested: &'a mut bool,
}

enum RowAction {
    Edit(CategoryId),
    Delete(CategoryId, String),
}

impl View for DashboardPage<'_> {
    fn ui(mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading(RichText::new("Dashboard").strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .button(RichText::new("Logout").color(ui.visuals().error_fg_color))
                    .clicked()
                {
                    *self.logout_requested = true;
                }
            });
        });

        ui.separator();

        self.create_ui(ui);

        ui.add_space(12.0);

        self.categories_ui(ui);

        self.edit_dialog_ui(ui.ctx());
        self.notice_ui(ui.ctx());
    }
}

impl DashboardPage<'_> {
    fn create_ui(&mut self, ui: &mut egui::Ui) {
        ui.label(RichText::new("Create Category").strong());

        let is_pending = self.tasks.is_pending(TaskKind::Create);
        let form = CategoryForm::new(self.dashboard.create_name.clone());
        let is_valid = garde::Validate::validate(&form, &()).is_ok();

        ui.horizontal(|ui| {
            let response = ui.add(egui::TextEdit::singleline(&mut self.dashboard.create_name).hint_text("Name"));
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            let clicked = ui
                .add_enabled(is_valid && !is_pending, egui::Button::new("Create"))
                .clicked();

            if is_valid && !is_pending && (clicked || submitted) {
                requests::create_category(self.tasks, self.categories, form);
            }

            if is_pending {
                ui.spinner();
            }
        });
    }

    fn categories_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Categories").strong());

            let is_fetching = self.tasks.is_pending(TaskKind::Fetch);
            if ui.add_enabled(!is_fetching, egui::Button::new("Refresh")).clicked() {
                requests::fetch_categories(self.tasks, self.categories);
            }
        });

        if self.dashboard.is_loading() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new("Loading categories...").weak());
            });
            return;
        }

        egui::ComboBox::from_label("Filter")
            .selected_text(self.dashboard.filter.label())
            .show_ui(ui, |ui| {
                for filter in Filter::iter() {
                    ui.selectable_value(&mut self.dashboard.filter, filter, filter.label());
                }
            });

        ui.add_space(4.0);

        let is_deleting = self.tasks.is_pending(TaskKind::Delete);
        let mut action = None;

        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(80.0))
            .column(Column::remainder().at_least(120.0))
            .column(Column::auto().at_least(50.0))
            .column(Column::auto())
            .header(20.0, |mut header| {
                for title in ["ID", "Name", "Active", "Actions"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for category in self.dashboard.filtered() {
                    body.row(24.0, |mut row| {
                        row.col(|ui| {
                            ui.label(RichText::new(category.id.as_str()).monospace());
                        });
                        row.col(|ui| {
                            ui.label(&category.name);
                        });
                        row.col(|ui| {
                            ui.label(if category.is_active { "Yes" } else { "No" });
                        });
                        row.col(|ui| {
                            if ui.link("Edit").clicked() {
                                action = Some(RowAction::Edit(category.id.clone()));
                            }

                            let delete = ui.add_enabled(
                                !is_deleting,
                                egui::Link::new(RichText::new("Delete").color(ui.visuals().error_fg_color)),
                            );
                            let popup_id = egui::Id::new("confirm_category_deletion").with(&category.id);
                            let question = format!("Delete {}?", category.name);
                            if let Some(true) = confirm_popup(ui, popup_id, &delete, &question) {
                                action = Some(RowAction::Delete(category.id.clone(), category.name.clone()));
                            }
                        });
                    });
                }
            });

        if self.dashboard.filtered().next().is_none() {
            ui.label(RichText::new("Nothing to show").weak());
        }

        match action {
            Some(RowAction::Edit(id)) => {
                self.dashboard.open_edit(&id);
            }
            Some(RowAction::Delete(id, name)) => {
                requests::delete_category(self.tasks, self.categories, id, name);
            }
            None => {}
        }
    }

    fn edit_dialog_ui(&mut self, ctx: &egui::Context) {
        let Some(edit) = self.dashboard.edit.as_mut() else {
            return;
        };

        let is_pending = self.tasks.is_pending(TaskKind::Update);
        let mut close = false;
        let mut submit = None;

        egui::Window::new("Edit Category")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.add(egui::TextEdit::singleline(&mut edit.name).hint_text("Name"));
                ui.checkbox(&mut edit.is_active, "Active");

                let form = CategoryForm::new(edit.name.clone());
                let is_valid = garde::Validate::validate(&form, &()).is_ok();
                if !is_valid {
                    ui.error_label("The name must not be empty");
                }

                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(is_valid && !is_pending, egui::Button::new("Update"))
                        .clicked()
                    {
                        let EditDialog { id, is_active, .. } = edit.clone();
                        submit = Some((id, form, is_active));
                    }

                    if ui.button("Cancel").clicked() {
                        close = true;
                    }

                    if is_pending {
                        ui.spinner();
                    }
                });
            });

        if let Some((id, form, is_active)) = submit {
            requests::update_category(self.tasks, self.categories, id, form, is_active);
        }

        if close {
            self.dashboard.close_edit();
        }
    }

    fn notice_ui(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        let Some(remaining) = self.dashboard.tick(now) else {
            return;
        };

        if let Some(notice) = self.dashboard.notice(now) {
            egui::Area::new(egui::Id::new("category_deleted_notice"))
                .anchor(Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .order(egui::Order::Foreground)
                .show(ctx, |ui| {
                    egui::Frame::popup(ui.style())
                        .fill(Color32::from_rgb(191, 219, 254))
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                ui.label(RichText::new(&notice.name).color(Color32::from_rgb(248, 113, 113)).size(18.0));
                                ui.label(RichText::new("has been deleted.").color(Color32::BLACK).size(18.0));
                            });
                        });
                });
        }

        ctx.request_repaint_after(remaining);
    }
}
