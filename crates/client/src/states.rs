use catdash_core::{
    config::Settings,
    dashboard::Dashboard,
    forms::{LoginForm, RegisterForm},
};

pub struct States {
    pub login: LoginState,
    pub register: RegisterState,
    pub dashboard: Dashboard,
    pub settings: SettingsState,
    pub windows: WindowsState,
}

impl States {
    pub fn new(settings: Settings) -> Self {
        Self {
            login: LoginState::default(),
            register: RegisterState::default(),
            dashboard: Dashboard::new(),
            settings: SettingsState::new(settings),
            windows: WindowsState::default(),
        }
    }
}

#[derive(Default)]
pub struct LoginState {
    pub form: LoginForm,
}

#[derive(Default)]
pub struct RegisterState {
    pub form: RegisterForm,
    pub created: bool,
}

pub struct SettingsState {
    /// What is on disk and in effect.
    pub saved: Settings,
    /// What the settings window is editing.
    pub draft: Settings,
}

impl SettingsState {
    pub fn new(settings: Settings) -> Self {
        Self {
            draft: settings.clone(),
            saved: settings,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.saved != self.draft
    }

    pub fn requires_restart(&self) -> bool {
        self.saved.api_url != self.draft.api_url
            || self.saved.request_timeout_secs != self.draft.request_timeout_secs
            || self.saved.log_level != self.draft.log_level
    }
}

#[derive(Default)]
pub struct WindowsState {
    pub settings: bool,
    pub logs: bool,
    pub errors: bool,
}
