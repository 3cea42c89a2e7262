use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Login,
    Register,
    Dashboard,
}

impl Page {
    pub fn route(&self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
        }
    }

    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Dashboard)
    }
}

impl Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Page::Login => f.write_str("Login"),
            Page::Register => f.write_str("Register"),
            Page::Dashboard => f.write_str("Dashboard"),
        }
    }
}

/// Current page plus the rule that the dashboard needs a session.
#[derive(Debug)]
pub struct Router {
    current: Page,
}

impl Router {
    /// Start on the dashboard when a token was restored.
    pub fn new(authenticated: bool) -> Self {
        Self {
            current: if authenticated { Page::Dashboard } else { Page::Login },
        }
    }

    pub fn current(&self) -> Page {
        self.current
    }

    /// Go to `page`, or to the login page if `page` needs a session we don't have.
    ///
    /// Returns the page that was actually entered.
    pub fn navigate(&mut self, page: Page, authenticated: bool) -> Page {
        self.current = if page.requires_auth() && !authenticated {
            tracing::debug!(route = page.route(), "Not logged in, redirecting to login");
            Page::Login
        } else {
            page
        };
        self.current
    }

    /// Re-check the current page. Returns `true` when a redirect happened.
    pub fn guard(&mut self, authenticated: bool) -> bool {
        let before = self.current;
        self.navigate(before, authenticated) != before
    }
}
