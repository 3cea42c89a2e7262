use std::{
    sync::{Arc, LazyLock},
    time::Duration,
};

use eframe::egui::{vec2, Context};
use egui_notify::{Toast, Toasts};
use parking_lot::RwLock;

pub static TOASTS: LazyLock<Arc<RwLock<Toasts>>> = LazyLock::new(|| Arc::new(RwLock::new(new())));

fn new() -> Toasts {
    Toasts::default().with_margin(vec2(8.0, 32.0))
}

pub fn show(ctx: &Context) {
    TOASTS.write().show(ctx);
}

fn add(writer: impl FnOnce(&mut Toasts) -> &mut Toast) {
    let mut toasts = TOASTS.write();
    writer(&mut toasts).set_duration(Some(Duration::from_secs(4)));
}

pub fn success(text: impl Into<String>) {
    add(|toasts| toasts.success(text));
}

pub fn info(text: impl Into<String>) {
    add(|toasts| toasts.info(text));
}

pub fn error(text: impl Into<String>) {
    add(|toasts| toasts.error(text));
}
