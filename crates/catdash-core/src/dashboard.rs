//! State behind the category dashboard.
//!
//! Nothing here talks to the network. Front-ends issue the requests and feed
//! the results back through the `apply_*` methods.

use std::{
    fmt::Display,
    str::FromStr,
    time::{Duration, Instant},
};

use catdash_api::category::{Category, CategoryId};
use serde::{Deserialize, Serialize};

/// How long the "has been deleted" notice stays visible.
pub const DELETE_NOTICE_DURATION: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Inactive,
}

impl Filter {
    pub fn iter() -> impl Iterator<Item = Filter> {
        [Self::All, Self::Active, Self::Inactive].into_iter()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }

    pub fn matches(&self, category: &Category) -> bool {
        match self {
            Self::All => true,
            Self::Active => category.is_active,
            Self::Inactive => !category.is_active,
        }
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Unknown values fall back to [`Filter::All`].
impl FromStr for Filter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "active" => Self::Active,
            "inactive" => Self::Inactive,
            _ => Self::All,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDialog {
    pub id: CategoryId,
    pub name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteNotice {
    pub name: String,
    pub shown_at: Instant,
}

impl DeleteNotice {
    pub fn message(&self) -> String {
        format!("{} has been deleted.", self.name)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= DELETE_NOTICE_DURATION
    }
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    categories: Vec<Category>,
    is_loading: bool,
    pub filter: Filter,
    pub create_name: String,
    pub edit: Option<EditDialog>,
    notice: Option<DeleteNotice>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            categories: Vec::new(),
            is_loading: true,
            filter: Filter::All,
            create_name: String::new(),
            edit: None,
            notice: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn set_categories(&mut self, categories: Vec<Category>) {
        self.categories = categories;
        self.is_loading = false;
    }

    pub fn filtered(&self) -> impl Iterator<Item = &Category> + '_ {
        self.categories.iter().filter(|c| self.filter.matches(c))
    }

    pub fn find(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    /// Open the edit dialog pre-filled from the category. Unknown ids are ignored.
    pub fn open_edit(&mut self, id: &CategoryId) -> bool {
        let Some(category) = self.find(id) else {
            return false;
        };

        self.edit = Some(EditDialog {
            id: category.id.clone(),
            name: category.name.clone(),
            is_active: category.is_active,
        });
        true
    }

    pub fn close_edit(&mut self) {
        self.edit = None;
    }

    pub fn apply_created(&mut self, category: Category) {
        self.categories.push(category);
        self.create_name.clear();
    }

    pub fn apply_updated(&mut self, id: &CategoryId, name: &str, is_active: bool) {
        if let Some(category) = self.categories.iter_mut().find(|c| &c.id == id) {
            name.clone_into(&mut category.name);
            category.is_active = is_active;
        }
        self.close_edit();
    }

    pub fn apply_deleted(&mut self, id: &CategoryId, name: impl Into<String>, now: Instant) {
        self.categories.retain(|c| &c.id != id);
        if self.edit.as_ref().is_some_and(|e| &e.id == id) {
            self.close_edit();
        }
        self.notice = Some(DeleteNotice {
            name: name.into(),
            shown_at: now,
        });
    }

    /// The deletion notice if it is still visible at `now`.
    pub fn notice(&self, now: Instant) -> Option<&DeleteNotice> {
        self.notice.as_ref().filter(|n| !n.is_expired(now))
    }

    /// Drop an expired notice. Returns how long the current one stays visible.
    pub fn tick(&mut self, now: Instant) -> Option<Duration> {
        if self.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notice = None;
        }
        self.notice
            .as_ref()
            .map(|n| DELETE_NOTICE_DURATION.saturating_sub(now.saturating_duration_since(n.shown_at)))
    }
}
