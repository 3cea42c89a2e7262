use std::fmt::Display;

use eframe::egui::{self, RichText};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use time::{macros::format_description, OffsetDateTime};

use crate::toasts;

/// Errors kept for the Errors window. Older entries are dropped past this.
const MAX_REPORTED: usize = 200;

pub static ERRORS_POOL: Lazy<RwLock<ErrorsPool>> = Lazy::new(|| RwLock::new(ErrorsPool::default()));

#[derive(Debug, Clone)]
pub struct Reported {
    pub message: String,
    pub at: OffsetDateTime,
}

/// Every error the user has been told about during this run.
#[derive(Default)]
pub struct ErrorsPool {
    errors: Vec<Reported>,
}

impl ErrorsPool {
    pub fn push_error(&mut self, error: impl Display) {
        if self.errors.len() == MAX_REPORTED {
            self.errors.remove(0);
        }

        self.errors.push(Reported {
            message: error.to_string(),
            at: OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc()),
        });
    }

    pub fn iter_errors(&self) -> impl DoubleEndedIterator<Item = &Reported> {
        self.errors.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }
}

/// Record the error and pop a toast for it.
pub fn report(error: impl Display) {
    let message = error.to_string();
    tracing::debug!(%message, "Reporting error");

    toasts::error(message.clone());
    ERRORS_POOL.write().push_error(message);
}

pub trait ErrorPoolExt<T> {
    fn report_error(self) -> Option<T>;
}

impl<T, E: Display> ErrorPoolExt<T> for Result<T, E> {
    fn report_error(self) -> Option<T> {
        self.map_err(report).ok()
    }
}

pub fn errors_ui(ui: &mut egui::Ui) {
    let time_format = format_description!("[hour]:[minute]:[second]");

    {
        let pool = ERRORS_POOL.read();

        if pool.is_empty() {
            ui.label("No errors");
            return;
        }

        egui::ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
            for error in pool.iter_errors().rev() {
                ui.horizontal_wrapped(|ui| {
                    if let Ok(time) = error.at.format(&time_format) {
                        ui.label(RichText::new(time).weak().monospace());
                    }
                    ui.label(RichText::new(&error.message).color(ui.visuals().error_fg_color));
                });
                ui.separator();
            }
        });
    }

    if ui.button("Clear").clicked() {
        ERRORS_POOL.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_pool_test() {
        let mut pool = ErrorsPool::default();
        for i in 0..(MAX_REPORTED + 5) {
            pool.push_error(format!("error {i}"));
        }

        assert_eq!(MAX_REPORTED, pool.len());
        assert_eq!("error 5", pool.iter_errors().next().unwrap().message);
    }

    #[test]
    fn report_error_test() {
        let ok: Result<u8, String> = Ok(1);
        assert_eq!(Some(1), ok.report_error());
    }
}
