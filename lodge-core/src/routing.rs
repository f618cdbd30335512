//! Path-based navigation and the protected-route gate.

use crate::identity::AuthState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Signup,
    DashboardHome,
    Bookings,
    Countries,
    Settings,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::DashboardHome => "/dashboard",
            Route::Bookings => "/dashboard/bookings",
            Route::Countries => "/dashboard/countries",
            Route::Settings => "/dashboard/settings",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Signup => "Sign Up",
            Route::DashboardHome => "Dashboard",
            Route::Bookings => "Bookings",
            Route::Countries => "Countries",
            Route::Settings => "Settings",
        }
    }

    /// `None` for paths the router does not know.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.trim_end_matches('/');
        match path {
            "/login" => Some(Route::Login),
            "/signup" => Some(Route::Signup),
            "/dashboard" => Some(Route::DashboardHome),
            "/dashboard/bookings" => Some(Route::Bookings),
            "/dashboard/countries" => Some(Route::Countries),
            "/dashboard/settings" => Some(Route::Settings),
            _ => None,
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login | Route::Signup)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// The session is still resolving; show a placeholder.
    Loading,
    Render(Route),
    /// `from` is the location the user asked for, kept for the return trip
    /// after signing in.
    Redirect { to: Route, from: Option<Route> },
}

pub fn gate(path: &str, auth: &AuthState) -> GateDecision {
    if matches!(auth, AuthState::Loading) {
        return GateDecision::Loading;
    }
    let signed_in = matches!(auth, AuthState::Authenticated(_));

    match Route::parse(path) {
        None => GateDecision::Redirect { to: Route::DashboardHome, from: None },
        Some(route) if route.is_protected() && !signed_in => {
            GateDecision::Redirect { to: Route::Login, from: Some(route) }
        }
        Some(route) if !route.is_protected() && signed_in => {
            GateDecision::Redirect { to: Route::DashboardHome, from: None }
        }
        Some(route) => GateDecision::Render(route),
    }
}

/// Sidebar entries, top to bottom.
pub const NAV_ITEMS: [Route; 4] = [Route::DashboardHome, Route::Bookings, Route::Countries, Route::Settings];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub label: &'static str,
    pub path: &'static str,
    pub active: bool,
}

pub fn breadcrumbs(current: Route) -> Vec<Breadcrumb> {
    let home = Route::DashboardHome;
    if current == home || !current.is_protected() {
        return vec![Breadcrumb { label: home.label(), path: home.path(), active: true }];
    }
    vec![
        Breadcrumb { label: home.label(), path: home.path(), active: false },
        Breadcrumb { label: current.label(), path: current.path(), active: true },
    ]
}
