//! UI preferences shared by every view: colour theme, sidebar and
//! notification toggles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

use crate::repository::LocalStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("Light"),
            Theme::Dark => f.write_str("Dark"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
    pub sidebar_collapsed: bool,
    pub notifications: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self { theme: Theme::default(), sidebar_collapsed: false, notifications: true }
    }
}

/// Owns the persisted [`Preferences`]. Created once at start-up and handed to
/// the views that read or flip them.
pub struct ThemeContext {
    store: Arc<dyn LocalStore>,
    preferences: Preferences,
}

impl ThemeContext {
    pub fn load(store: Arc<dyn LocalStore>) -> Self {
        let preferences = store.load_preferences().unwrap_or_else(|e| {
            warn!("Falling back to default preferences: {}", e);
            Preferences::default()
        });
        Self { store, preferences }
    }

    pub fn theme(&self) -> Theme {
        self.preferences.theme
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.preferences.theme = self.preferences.theme.toggled();
        self.persist();
        self.preferences.theme
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.preferences.sidebar_collapsed = !self.preferences.sidebar_collapsed;
        self.persist();
        self.preferences.sidebar_collapsed
    }

    pub fn toggle_notifications(&mut self) -> bool {
        self.preferences.notifications = !self.preferences.notifications;
        self.persist();
        self.preferences.notifications
    }

    fn persist(&self) {
        if let Err(e) = self.store.save_preferences(&self.preferences) {
            warn!("Failed to save preferences: {}", e);
        }
    }
}
