//! Fire-and-forget requests started from the views.

use catdash_core::{
    api::category::CategoryId,
    forms::{CategoryForm, LoginForm, RegisterForm},
    service::{AuthService, CategoryService},
};

use crate::task::{AppEvent, TaskKind, Tasks};

pub fn login(tasks: &mut Tasks, auth: &AuthService, form: LoginForm) {
    let auth = auth.clone();
    tasks.spawn(TaskKind::Login, async move { AppEvent::LoggedIn(auth.login(&form).await) });
}

pub fn register(tasks: &mut Tasks, auth: &AuthService, form: RegisterForm) {
    let auth = auth.clone();
    tasks.spawn(TaskKind::Register, async move {
        AppEvent::Registered(auth.register(&form).await)
    });
}

pub fn fetch_categories(tasks: &mut Tasks, categories: &CategoryService) {
    if tasks.is_pending(TaskKind::Fetch) {
        return;
    }

    let categories = categories.clone();
    tasks.spawn(TaskKind::Fetch, async move { AppEvent::Fetched(categories.list().await) });
}

pub fn create_category(tasks: &mut Tasks, categories: &CategoryService, form: CategoryForm) {
    let categories = categories.clone();
    tasks.spawn(TaskKind::Create, async move {
        AppEvent::Created(categories.create(&form).await)
    });
}

pub fn update_category(
    tasks: &mut Tasks,
    categories: &CategoryService,
    id: CategoryId,
    form: CategoryForm,
    is_active: bool,
) {
    let categories = categories.clone();
    tasks.spawn(TaskKind::Update, async move {
        let result = categories.update(&id, &form, is_active).await;
        AppEvent::Updated {
            id,
            name: form.trimmed_name().to_owned(),
            is_active,
            result,
        }
    });
}

pub fn delete_category(tasks: &mut Tasks, categories: &CategoryService, id: CategoryId, name: String) {
    let categories = categories.clone();
    tasks.spawn(TaskKind::Delete, async move {
        let result = categories.delete(&id).await;
        AppEvent::Deleted { id, name, result }
    });
}
