use clap::Args;
use lodge_core::routing::Route;
use lodge_views::{LoginForm, SignupForm};
use std::io::Write;

use crate::error::AppError;
use crate::render;
use crate::state::AppState;

#[derive(Debug, Args)]
pub struct Credentials {
    #[arg(long)]
    email: String,

    #[arg(long, env = "LODGE_PASSWORD", hide_env_values = true)]
    password: String,
}

fn signed_in_as(state: &AppState) -> String {
    state
        .auth
        .user()
        .and_then(|u| u.email.clone())
        .unwrap_or_else(|| "<no email>".into())
}

pub async fn login(args: Credentials, state: &mut AppState, out: &mut dyn Write) -> Result<(), AppError> {
    if state.require(Route::Login).is_err() {
        writeln!(out, "Already signed in as {}", signed_in_as(state))?;
        return Ok(());
    }

    let mut form = LoginForm::new(state.login_timeout());
    form.email = args.email;
    form.password = args.password;

    match form.submit(&mut state.auth).await {
        Some(_) => {
            writeln!(out, "Signed in as {}", signed_in_as(state))?;
            Ok(())
        }
        None => Err(AppError::Rejected(form.error().unwrap_or_default().to_string())),
    }
}

pub async fn signup(args: Credentials, state: &mut AppState, out: &mut dyn Write) -> Result<(), AppError> {
    if state.require(Route::Signup).is_err() {
        writeln!(out, "Already signed in as {}", signed_in_as(state))?;
        return Ok(());
    }

    let mut form = SignupForm::new(state.login_timeout());
    form.email = args.email;
    form.password = args.password;

    let next = form.submit(&mut state.auth).await;
    if let Some(error) = form.error() {
        return Err(AppError::Rejected(error.to_string()));
    }
    match (next, form.message()) {
        (Some(_), _) => writeln!(out, "Signed in as {}", signed_in_as(state))?,
        (None, Some(message)) => writeln!(out, "{}", message)?,
        (None, None) => {}
    }
    Ok(())
}

pub async fn logout(state: &mut AppState, out: &mut dyn Write) -> Result<(), AppError> {
    state.auth.sign_out().await;
    writeln!(out, "Signed out")?;
    Ok(())
}

pub fn whoami(state: &AppState, out: &mut dyn Write) -> Result<(), AppError> {
    state.require(Route::DashboardHome)?;
    if let Some(user) = state.auth.user() {
        writeln!(out, "{}", render::user(user))?;
    }
    Ok(())
}
