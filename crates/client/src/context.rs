use std::time::Instant;

use catdash_core::{
    config::Settings,
    error::ServiceError,
    paths::DataPaths,
    service::{AuthService, CategoryService},
    session::{Session, SharedSession},
    store::{FileStore, MemoryStore},
};
use eframe::egui;
use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};

use crate::{
    channel::Channel,
    errors_pool::report,
    pages::{Page, Router},
    requests,
    states::States,
    subscriber::EguiLayer,
    task::{AppEvent, Delivered, Tasks},
    toasts,
};

pub struct AppContext {
    pub auth: AuthService,
    pub categories: CategoryService,

    pub router: Router,
    pub states: States,
    pub tasks: Tasks,
    pub paths: DataPaths,
    pub egui_layer: EguiLayer,

    events: Channel<Delivered>,
}

impl AppContext {
    pub fn new(
        handle: Handle,
        settings: Settings,
        paths: DataPaths,
        egui_layer: EguiLayer,
    ) -> anyhow::Result<Self> {
        let session = open_session(&paths);
        // `settings` stays as read from disk, the override only reaches the client.
        let api = settings.clone().with_env_overrides().api()?;

        let auth = AuthService::new(api.clone(), session.clone());
        let categories = CategoryService::new(api, session);

        let events = Channel::new(64);
        let tasks = Tasks::new(handle, events.clone_tx());

        let router = Router::new(auth.is_authenticated());

        Ok(Self {
            auth,
            categories,
            router,
            states: States::new(settings),
            tasks,
            paths,
            egui_layer,
            events,
        })
    }

    /// Kick off the first load when a restored session landed on the dashboard.
    pub fn start(&mut self) {
        if self.router.current() == Page::Dashboard {
            requests::fetch_categories(&mut self.tasks, &self.categories);
        }
    }

    #[must_use]
    pub fn with_repaint(mut self, ctx: &egui::Context) -> Self {
        self.tasks = self.tasks.with_repaint(ctx.clone());
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    /// Switch pages. Entering the dashboard always reloads it.
    pub fn navigate(&mut self, page: Page) {
        let entered = self.router.navigate(page, self.is_authenticated());
        if entered == Page::Dashboard {
            self.states.dashboard = Default::default();
            requests::fetch_categories(&mut self.tasks, &self.categories);
        }
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.auth.logout() {
            report(e);
        }
        // Requests made with the old token must not reach the next session.
        self.tasks.reset();
        self.states.dashboard = Default::default();
        self.navigate(Page::Login);
    }

    /// Apply everything the background tasks produced since the last frame.
    pub fn handle_events(&mut self) {
        for delivered in self.events.drain() {
            if !self.tasks.is_current(&delivered) {
                debug!(task = delivered.event.kind().name(), "Dropping a result from a previous session");
                continue;
            }

            let event = delivered.event;
            self.tasks.finish(event.kind());
            self.handle_event(event);
        }

        if self.router.guard(self.is_authenticated()) {
            info!("Session is gone, back to login");
        }
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::LoggedIn(Ok(())) => {
                self.states.login.form.clear();
                toasts::success("Login successful!");
                self.navigate(Page::Dashboard);
            }
            AppEvent::Registered(Ok(_)) => {
                self.states.register.form.clear();
                self.states.register.created = true;
            }
            AppEvent::Fetched(Ok(categories)) => self.states.dashboard.set_categories(categories),
            AppEvent::Created(Ok(category)) => {
                toasts::success(format!("{} has been created", category.name));
                self.states.dashboard.apply_created(category);
            }
            AppEvent::Updated {
                id,
                name,
                is_active,
                result: Ok(()),
            } => self.states.dashboard.apply_updated(&id, &name, is_active),
            AppEvent::Deleted { id, name, result: Ok(()) } => {
                self.states.dashboard.apply_deleted(&id, name, Instant::now());
            }

            AppEvent::LoggedIn(Err(e))
            | AppEvent::Registered(Err(e))
            | AppEvent::Fetched(Err(e))
            | AppEvent::Created(Err(e))
            | AppEvent::Updated { result: Err(e), .. }
            | AppEvent::Deleted { result: Err(e), .. } => self.handle_error(e),
        }
    }

    fn handle_error(&mut self, e: ServiceError) {
        if e.is_unauthorized() {
            warn!("The server rejected the token");
            toasts::info("Your session has expired, please log in again");
            self.logout();
            return;
        }

        report(e);
    }
}

fn open_session(paths: &DataPaths) -> SharedSession {
    let session = match FileStore::open(paths.storage()) {
        Ok(store) => Session::restored(store),
        Err(e) => {
            error!(error = %e, "Cannot open the storage, the session will not be persisted");
            Session::new(MemoryStore::new())
        }
    };

    session.into_shared()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use catdash_core::{
        api::category::CategoryId,
        forms::{CategoryForm, LoginForm},
        store::KeyValueStore,
        TOKEN_KEY,
    };
    use serde_json::json;
    use wiremock::{
        matchers::{body_partial_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use crate::task::TaskKind;

    use super::*;

    fn context(server: &MockServer, dir: &tempfile::TempDir) -> AppContext {
        let settings = Settings {
            api_url: server.uri(),
            ..Default::default()
        };

        AppContext::new(Handle::current(), settings, DataPaths::new(dir.path()), EguiLayer::new()).unwrap()
    }

    /// Run frames until `done` holds, like the window would.
    async fn frames_until(context: &mut AppContext, done: impl Fn(&AppContext) -> bool) {
        for _ in 0..200 {
            context.handle_events();
            if done(&*context) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached, page is {}", context.router.current());
    }

    async fn frames_for(context: &mut AppContext, duration: Duration) {
        let end = Instant::now() + duration;
        while Instant::now() < end {
            context.handle_events();
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    fn names(context: &AppContext) -> Vec<String> {
        context
            .states
            .dashboard
            .categories()
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }

    async fn mount_login(server: &MockServer, email: &str, token: &str) {
        Mock::given(method("POST"))
            .and(path("/api/user/login"))
            .and(body_partial_json(json!({ "email": email })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": token })))
            .mount(server)
            .await;
    }

    async fn mount_list(server: &MockServer, token: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/api/category/"))
            .and(header("Authorization", format!("Bearer {token}").as_str()))
            .respond_with(response)
            .mount(server)
            .await;
    }

    async fn login(context: &mut AppContext, email: &str) {
        requests::login(&mut context.tasks, &context.auth, LoginForm::new(email, "pw"));
        frames_until(context, |c| c.router.current() == Page::Dashboard).await;
    }

    #[tokio::test]
    async fn login_opens_dashboard_and_fetches_test() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        mount_login(&server, "a@example.com", "A").await;
        mount_list(
            &server,
            "A",
            ResponseTemplate::new(200).set_body_json(json!({ "data": [{ "id": "1", "name": "Food", "is_active": true }] })),
        )
        .await;

        let mut context = context(&server, &dir);
        assert_eq!(Page::Login, context.router.current());

        login(&mut context, "a@example.com").await;
        assert!(context.is_authenticated());

        frames_until(&mut context, |c| !c.states.dashboard.is_loading()).await;
        assert_eq!(vec!["Food"], names(&context));
        assert!(context.tasks.is_idle());
    }

    #[tokio::test]
    async fn previous_session_fetch_is_dropped_test() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        mount_login(&server, "a@example.com", "A").await;
        mount_login(&server, "b@example.com", "B").await;
        mount_list(
            &server,
            "A",
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": [{ "id": "1", "name": "A-secret" }] }))
                .set_delay(Duration::from_millis(400)),
        )
        .await;
        mount_list(
            &server,
            "B",
            ResponseTemplate::new(200).set_body_json(json!({ "data": [{ "id": "2", "name": "B-own" }] })),
        )
        .await;

        let mut context = context(&server, &dir);

        login(&mut context, "a@example.com").await;
        assert!(context.tasks.is_pending(TaskKind::Fetch));

        context.logout();
        assert_eq!(Page::Login, context.router.current());
        assert!(!context.tasks.is_pending(TaskKind::Fetch));

        login(&mut context, "b@example.com").await;

        // Long enough for the first user's delayed response to arrive.
        frames_for(&mut context, Duration::from_secs(1)).await;

        assert!(context.is_authenticated());
        assert_eq!(Page::Dashboard, context.router.current());
        assert_eq!(vec!["B-own"], names(&context));
    }

    #[tokio::test]
    async fn unauthorized_logs_out_test() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        mount_login(&server, "a@example.com", "expired").await;
        mount_list(
            &server,
            "expired",
            ResponseTemplate::new(401).set_body_json(json!({ "message": "jwt expired" })),
        )
        .await;

        let mut context = context(&server, &dir);
        login(&mut context, "a@example.com").await;

        frames_until(&mut context, |c| c.router.current() == Page::Login).await;
        assert!(!context.is_authenticated());

        let stored = FileStore::open(DataPaths::new(dir.path()).storage()).unwrap();
        assert_eq!(None, stored.get(TOKEN_KEY));
    }

    #[tokio::test]
    async fn update_and_delete_apply_to_dashboard_test() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        mount_login(&server, "a@example.com", "A").await;
        mount_list(
            &server,
            "A",
            ResponseTemplate::new(200).set_body_json(json!({ "data": [
                { "id": "1", "name": "Food", "is_active": false },
                { "id": "2", "name": "Games", "is_active": true }
            ] })),
        )
        .await;
        Mock::given(method("PUT"))
            .and(path("/api/category/update"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/category/2/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut context = context(&server, &dir);
        login(&mut context, "a@example.com").await;
        frames_until(&mut context, |c| !c.states.dashboard.is_loading()).await;

        let food = CategoryId::new("1");
        assert!(context.states.dashboard.open_edit(&food));
        requests::update_category(
            &mut context.tasks,
            &context.categories,
            food.clone(),
            CategoryForm::new(" Snacks "),
            true,
        );
        frames_until(&mut context, |c| c.states.dashboard.edit.is_none()).await;

        let updated = context.states.dashboard.find(&food).unwrap();
        assert_eq!("Snacks", updated.name);
        assert!(updated.is_active);

        requests::delete_category(&mut context.tasks, &context.categories, CategoryId::new("2"), "Games".to_owned());
        frames_until(&mut context, |c| c.states.dashboard.categories().len() == 1).await;

        let now = Instant::now();
        let notice = context.states.dashboard.notice(now).unwrap();
        assert_eq!("Games has been deleted.", notice.message());
        assert!(context.states.dashboard.notice(now + Duration::from_secs(2)).is_none());
    }
}
