use chrono::{Local, NaiveDate};
use clap::Args;
use lodge_core::routing::{gate, GateDecision, Route};
use lodge_views::{DashboardHome, DashboardShell, LoadOutcome};
use std::io::Write;

use crate::error::AppError;
use crate::render;
use crate::state::AppState;

#[derive(Debug, Args)]
pub struct HomeArgs {
    /// Arrivals on or after this day count as upcoming. Defaults to today.
    #[arg(long)]
    from: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub struct NavArgs {
    #[arg(default_value = "/dashboard")]
    path: String,
}

pub async fn home(args: HomeArgs, state: &mut AppState, out: &mut dyn Write) -> Result<(), AppError> {
    state.require(Route::DashboardHome)?;
    let mut home = DashboardHome::new(state.api.clone(), state.view_lifetime());
    if home.load().await == LoadOutcome::Failed {
        return Err(AppError::Backend("Could not load bookings".into()));
    }
    let from = args.from.unwrap_or_else(|| Local::now().date_naive());
    writeln!(out, "{}", render::summary(&home.summary(from)))?;
    Ok(())
}

pub async fn nav(args: NavArgs, state: &mut AppState, out: &mut dyn Write) -> Result<(), AppError> {
    let route = match gate(&args.path, state.auth.state()) {
        GateDecision::Render(route) => route,
        GateDecision::Loading => {
            writeln!(out, "Loading...")?;
            return Ok(());
        }
        GateDecision::Redirect { to: Route::Login, from } => {
            return Err(AppError::NotSignedIn { from });
        }
        GateDecision::Redirect { to, .. } => {
            writeln!(out, "Redirected to {}", to.path())?;
            return Ok(());
        }
    };

    let mut shell = DashboardShell::new(state.api.clone(), state.theme(), state.view_lifetime());
    shell.navigate(route);
    shell.load_gh_name().await;

    let name = match shell.gh_name() {
        "" => "Guest House",
        name => name,
    };
    writeln!(out, "{} | {} theme", name, shell.theme())?;
    if !shell.sidebar_collapsed() {
        writeln!(out, "{}", render::nav(&shell.nav_items()))?;
    }
    writeln!(out, "{}", render::breadcrumbs(&shell.breadcrumbs()))?;
    Ok(())
}

pub fn toggle_theme(state: &mut AppState, out: &mut dyn Write) -> Result<(), AppError> {
    let theme = state.theme().toggle_theme();
    writeln!(out, "Theme: {}", theme)?;
    Ok(())
}

pub fn toggle_sidebar(state: &mut AppState, out: &mut dyn Write) -> Result<(), AppError> {
    let collapsed = state.theme().toggle_sidebar();
    writeln!(out, "Sidebar: {}", if collapsed { "collapsed" } else { "expanded" })?;
    Ok(())
}
