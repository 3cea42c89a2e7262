use catdash_core::{config::Settings, paths::DataPaths, CATDASH_NAME, CATDASH_VERSION};
use context::AppContext;
use eframe::{
    egui::{self, ViewportBuilder},
    epaint::Vec2,
};
use pages::Page;
use subscriber::EguiLayer;
use tokio::runtime::Handle;
use tracing::{info, Level};
use tracing_subscriber::{fmt::Layer, prelude::*, EnvFilter};
use utils::Crash;
use views::{DashboardPage, LoginPage, LogsPage, RegisterPage, SettingsPage, View};

pub mod channel;
pub mod context;
pub mod errors_pool;
pub mod pages;
pub mod popup;
pub mod requests;
pub mod states;
pub mod subscriber;
pub mod task;
pub mod toasts;
pub mod ui_ext;
pub mod utils;
pub mod views;

fn main() {
    let paths = DataPaths::default();
    let settings = Settings::load(paths.settings());

    let level = settings.log_level.parse::<Level>().unwrap_or(Level::INFO);
    let egui_layer = EguiLayer::new().with_level(level);

    let appender = tracing_appender::rolling::daily(paths.logs(), "catdash.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file_sub = Layer::new().with_writer(non_blocking).with_ansi(false).compact();
    let stdout_sub = Layer::new().with_writer(std::io::stdout).pretty();

    tracing_subscriber::registry()
        .with(filter)
        .with(egui_layer.clone())
        .with(stdout_sub)
        .with(file_sub)
        .init();

    let api_url = Settings::env_api_url().unwrap_or_else(|| settings.api_url.clone());
    info!(version = CATDASH_VERSION, %api_url, "Starting {CATDASH_NAME}");

    let runtime = tokio::runtime::Runtime::new().crash();
    let handle = runtime.handle().clone();

    let result = eframe::run_native(
        "Catdash",
        eframe::NativeOptions {
            viewport: ViewportBuilder::default()
                .with_inner_size(Vec2::new(1024.0, 720.0))
                .with_min_inner_size(Vec2::new(480.0, 360.0)),
            ..Default::default()
        },
        Box::new(move |cc| Ok(Box::new(MyApp::new(cc, handle, settings, paths, egui_layer)?))),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "The window closed with an error");
    }

    runtime.shutdown_timeout(std::time::Duration::from_secs(1));
}

struct MyApp {
    context: AppContext,
}

impl MyApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
        handle: Handle,
        settings: Settings,
        paths: DataPaths,
        egui_layer: EguiLayer,
    ) -> anyhow::Result<Self> {
        cc.egui_ctx.set_pixels_per_point(settings.pixels_per_point);

        let mut context = AppContext::new(handle, settings, paths, egui_layer)?.with_repaint(&cc.egui_ctx);
        context.start();

        Ok(Self { context })
    }

    fn top_bar(&mut self, ui: &mut egui::Ui) {
        let authenticated = self.context.is_authenticated();
        let current = self.context.router.current();

        ui.with_layout(egui::Layout::left_to_right(egui::Align::Center), |ui| {
            ui.strong("Catdash");
            ui.separator();

            let pages: &[Page] = if authenticated {
                &[Page::Dashboard]
            } else {
                &[Page::Login, Page::Register]
            };

            for page in pages {
                if ui.selectable_label(current == *page, page.to_string()).clicked() && current != *page {
                    self.context.navigate(*page);
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let windows = &mut self.context.states.windows;
                ui.toggle_value(&mut windows.errors, "Errors");
                ui.toggle_value(&mut windows.logs, "Logs");
                ui.toggle_value(&mut windows.settings, "Settings");

                if !self.context.tasks.is_idle() {
                    ui.spinner();
                }
            });
        });
    }

    fn windows(&mut self, ctx: &egui::Context) {
        let context = &mut self.context;
        let windows = &mut context.states.windows;

        egui::Window::new("Settings")
            .open(&mut windows.settings)
            .resizable(false)
            .show(ctx, |ui| {
                SettingsPage {
                    state: &mut context.states.settings,
                    paths: &context.paths,
                }
                .ui(ui);
            });

        egui::Window::new("Logs")
            .open(&mut windows.logs)
            .resizable(true)
            .show(ctx, |ui| {
                LogsPage {
                    layer: &context.egui_layer,
                }
                .ui(ui);
            });

        egui::Window::new("Errors")
            .open(&mut windows.errors)
            .resizable(false)
            .show(ctx, errors_pool::errors_ui);
    }
}

impl eframe::App for MyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.context.handle_events();

        let scale = self.context.states.settings.draft.pixels_per_point;
        if (ctx.pixels_per_point() - scale).abs() > f32::EPSILON {
            ctx.set_pixels_per_point(scale);
        }

        egui::TopBottomPanel::top("top_nav_bar").show(ctx, |ui| self.top_bar(ui));

        self.windows(ctx);

        let mut logout_requested = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            let context = &mut self.context;
            match context.router.current() {
                Page::Login => LoginPage {
                    state: &mut context.states.login,
                    tasks: &mut context.tasks,
                    auth: &context.auth,
                    router: &mut context.router,
                }
                .ui(ui),
                Page::Register => RegisterPage {
                    state: &mut context.states.register,
                    tasks: &mut context.tasks,
                    auth: &context.auth,
                    router: &mut context.router,
                }
                .ui(ui),
                Page::Dashboard => DashboardPage {
                    dashboard: &mut context.states.dashboard,
                    tasks: &mut context.tasks,
                    categories: &context.categories,
                    logout_requested: &mut logout_requested,
                }
                .ui(ui),
            }
        });

        if logout_requested {
            info!("Logging out");
            self.context.logout();
        }

        toasts::show(ctx);
    }
}
