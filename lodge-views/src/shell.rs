//! Sidebar, top bar and the content outlet around every dashboard page.

use lodge_core::repository::fetch_first;
use lodge_core::routing::{breadcrumbs, Breadcrumb, Route, NAV_ITEMS};
use lodge_core::shell::{Theme, ThemeContext};
use lodge_core::tables::GUEST_HOUSES;
use lodge_core::{DataApi, SelectQuery};
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub route: Route,
    pub label: &'static str,
    pub path: &'static str,
    pub active: bool,
}

#[derive(Deserialize)]
struct GuestHouseName {
    #[serde(default)]
    gh_name: Option<String>,
}

pub struct DashboardShell {
    api: Arc<dyn DataApi>,
    theme: ThemeContext,
    lifetime: CancellationToken,
    current: Route,
    mobile_menu_open: bool,
    gh_name: String,
}

impl DashboardShell {
    pub fn new(api: Arc<dyn DataApi>, theme: ThemeContext, lifetime: CancellationToken) -> Self {
        Self {
            api,
            theme,
            lifetime,
            current: Route::DashboardHome,
            mobile_menu_open: false,
            gh_name: String::new(),
        }
    }

    /// Fetches the guest-house name for the top bar. Stays blank on failure.
    pub async fn load_gh_name(&mut self) {
        let query = SelectQuery::from(GUEST_HOUSES).columns(&["gh_name"]);
        let token = self.lifetime.clone();
        let fetched = tokio::select! {
            biased;
            _ = token.cancelled() => return,
            row = fetch_first::<GuestHouseName>(self.api.as_ref(), query) => row,
        };

        match fetched {
            Ok(row) => self.gh_name = row.and_then(|r| r.gh_name).unwrap_or_default(),
            Err(e) => error!("Error fetching guest house name: {}", e),
        }
    }

    pub fn gh_name(&self) -> &str {
        &self.gh_name
    }

    pub fn current(&self) -> Route {
        self.current
    }

    pub fn navigate(&mut self, route: Route) {
        self.current = route;
        self.mobile_menu_open = false;
    }

    pub fn nav_items(&self) -> Vec<NavItem> {
        NAV_ITEMS
            .iter()
            .map(|route| NavItem {
                route: *route,
                label: route.label(),
                path: route.path(),
                active: route.path() == self.current.path(),
            })
            .collect()
    }

    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        breadcrumbs(self.current)
    }

    pub fn theme(&self) -> Theme {
        self.theme.theme()
    }

    pub fn theme_context(&mut self) -> &mut ThemeContext {
        &mut self.theme
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme.toggle_theme()
    }

    pub fn sidebar_collapsed(&self) -> bool {
        self.theme.preferences().sidebar_collapsed
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.theme.toggle_sidebar()
    }

    pub fn mobile_menu_open(&self) -> bool {
        self.mobile_menu_open
    }

    pub fn toggle_mobile_menu(&mut self) -> bool {
        self.mobile_menu_open = !self.mobile_menu_open;
        self.mobile_menu_open
    }

    pub fn unmount(&self) {
        self.lifetime.cancel();
    }
}
