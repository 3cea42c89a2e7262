use std::{collections::VecDeque, sync::Arc};

use eframe::egui::{self, Color32, RichText};
use parking_lot::Mutex;
use time::{macros::format_description, OffsetDateTime};
use tracing::{
    field::{Field, Visit},
    Event, Level, Subscriber,
};
use tracing_subscriber::{layer::Context, registry::LookupSpan, Layer};

const MAX_EVENTS: usize = 1000;

/// Keeps recent events in memory so the Logs window can render them.
#[derive(Clone)]
pub struct EguiLayer {
    events: Arc<Mutex<VecDeque<EventData>>>,
    level: Level,
}

impl Default for EguiLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl EguiLayer {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::new())),
            level: Level::INFO,
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn add_event(&self, event: EventData) {
        if event.level > self.level {
            return;
        }

        let mut events = self.events.lock();
        if events.len() == MAX_EVENTS {
            events.pop_front();
        }
        events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    pub fn level_color(level: Level) -> Color32 {
        match level {
            Level::TRACE => Color32::GRAY,
            Level::DEBUG => Color32::LIGHT_BLUE,
            Level::WARN => Color32::from_rgb(196, 160, 0),
            Level::INFO => Color32::LIGHT_GREEN,
            Level::ERROR => Color32::LIGHT_RED,
        }
    }

    pub fn ui(&self, ui: &mut egui::Ui) {
        let time_format = format_description!("[hour]:[minute]:[second]");

        let events = self.events.lock();
        for event in events.iter() {
            let color = Self::level_color(event.level);

            ui.horizontal_wrapped(|ui| {
                if let Ok(time) = event.time.format(&time_format) {
                    ui.label(RichText::new(time).weak().monospace());
                }
                ui.colored_label(color, RichText::new(event.level.as_str()).monospace());
                ui.label(RichText::new(&event.target).weak());
                ui.label(&event.message);

                for (name, content) in &event.fields {
                    ui.colored_label(color, format!("{name}={content}"));
                }
            });
        }
    }
}

impl<S> Layer<S> for EguiLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        self.add_event(EventData::new(event));
    }
}

#[derive(Debug, Clone)]
pub struct EventData {
    pub target: String,
    pub level: Level,
    pub message: String,
    pub fields: Vec<(String, String)>,
    pub time: OffsetDateTime,
}

impl EventData {
    pub fn new(event: &Event<'_>) -> Self {
        let metadata = event.metadata();

        let mut visitor = FieldsVisitor::default();
        event.record(&mut visitor);

        EventData {
            target: metadata.target().to_owned(),
            level: metadata.level().to_owned(),
            message: visitor.message,
            fields: visitor.fields,
            time: OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc()),
        }
    }
}

#[derive(Default)]
struct FieldsVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl Visit for FieldsVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.message);
        } else {
            self.fields.push((field.name().to_owned(), value.to_owned()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push((field.name().to_owned(), format!("{value:?}")));
        }
    }
}
