use std::{collections::HashSet, future::Future};

use catdash_core::{
    api::{
        category::{Category, CategoryId},
        user::Registered,
    },
    error::ServiceError,
};
use eframe::egui;
use tokio::{runtime::Handle, sync::mpsc::Sender};
use tracing::{debug, info_span, Instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Login,
    Register,
    Fetch,
    Create,
    Update,
    Delete,
}

impl TaskKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
            Self::Fetch => "fetch_categories",
            Self::Create => "create_category",
            Self::Update => "update_category",
            Self::Delete => "delete_category",
        }
    }
}

/// Result of a background request, delivered to the UI thread.
#[derive(Debug)]
pub enum AppEvent {
    LoggedIn(Result<(), ServiceError>),
    Registered(Result<Registered, ServiceError>),
    Fetched(Result<Vec<Category>, ServiceError>),
    Created(Result<Category, ServiceError>),
    Updated {
        id: CategoryId,
        name: String,
        is_active: bool,
        result: Result<(), ServiceError>,
    },
    Deleted {
        id: CategoryId,
        name: String,
        result: Result<(), ServiceError>,
    },
}

impl AppEvent {
    pub fn kind(&self) -> TaskKind {
        match self {
            Self::LoggedIn(_) => TaskKind::Login,
            Self::Registered(_) => TaskKind::Register,
            Self::Fetched(_) => TaskKind::Fetch,
            Self::Created(_) => TaskKind::Create,
            Self::Updated { .. } => TaskKind::Update,
            Self::Deleted { .. } => TaskKind::Delete,
        }
    }
}

/// An [`AppEvent`] tagged with the session generation its task was started in.
#[derive(Debug)]
pub struct Delivered {
    pub generation: u64,
    pub event: AppEvent,
}

/// Spawns requests on the runtime and remembers which kinds are in flight.
pub struct Tasks {
    handle: Handle,
    tx: Sender<Delivered>,
    egui_ctx: Option<egui::Context>,
    pending: HashSet<TaskKind>,
    generation: u64,
}

impl Tasks {
    pub fn new(handle: Handle, tx: Sender<Delivered>) -> Self {
        Self {
            handle,
            tx,
            egui_ctx: None,
            pending: HashSet::new(),
            generation: 0,
        }
    }

    /// Repaint `ctx` whenever a task finishes.
    #[must_use]
    pub fn with_repaint(mut self, ctx: egui::Context) -> Self {
        self.egui_ctx = Some(ctx);
        self
    }

    pub fn spawn<F>(&mut self, kind: TaskKind, future: F)
    where
        F: Future<Output = AppEvent> + Send + 'static,
    {
        self.pending.insert(kind);

        let tx = self.tx.clone();
        let egui_ctx = self.egui_ctx.clone();
        let generation = self.generation;
        let span = info_span!("task", name = kind.name(), generation);

        self.handle.spawn(
            async move {
                let event = future.await;
                debug!("Task finished");
                let _ = tx.send(Delivered { generation, event }).await;
                if let Some(ctx) = egui_ctx {
                    ctx.request_repaint();
                }
            }
            .instrument(span),
        );
    }

    pub fn finish(&mut self, kind: TaskKind) {
        self.pending.remove(&kind);
    }

    pub fn is_pending(&self, kind: TaskKind) -> bool {
        self.pending.contains(&kind)
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Forget everything in flight. Results of tasks spawned before this call
    /// carry an older generation and must be ignored.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.pending.clear();
        debug!(generation = self.generation, "Tasks reset");
    }

    /// Whether `delivered` belongs to the current generation.
    pub fn is_current(&self, delivered: &Delivered) -> bool {
        delivered.generation == self.generation
    }
}
