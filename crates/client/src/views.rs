use eframe::egui::Ui;

pub mod dashboard;
pub mod login;
pub mod logs;
pub mod register;
pub mod settings;

pub use dashboard::*;
pub use login::*;
pub use logs::*;
pub use register::*;
pub use settings::*;

pub trait View: Sized {
    fn ui(self, ui: &mut Ui);
}
