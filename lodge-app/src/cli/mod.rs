use clap::{Parser, Subcommand};
use lodge_core::forms::EntityForm;
use lodge_views::{
    AlwaysConfirm, Confirm, DeleteOutcome, EntityList, LoadOutcome, SubmitOutcome,
};
use std::io::{self, BufRead, Write};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

mod auth;
mod bookings;
mod countries;
mod settings;
mod shell;

#[derive(Debug, Parser)]
#[command(name = "lodge", about = "Guest-house management dashboard", long_about = None)]
pub struct Cli {
    /// Answer yes to every confirmation prompt
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in with e-mail and password
    Login(auth::Credentials),
    /// Create an account
    Signup(auth::Credentials),
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Summary of all bookings
    Home(shell::HomeArgs),
    /// Resolve a dashboard path through the route gate and show the shell
    Nav(shell::NavArgs),
    /// Switch between light and dark theme
    Theme,
    /// Collapse or expand the sidebar
    Sidebar,
    Bookings(bookings::BookingsCommand),
    Countries(countries::CountriesCommand),
    Settings(settings::SettingsCommand),
}

impl Cli {
    pub async fn run(self, state: &mut AppState, out: &mut dyn Write) -> Result<(), AppError> {
        let confirm: Box<dyn Confirm> = if self.yes {
            Box::new(AlwaysConfirm)
        } else {
            Box::new(StdinConfirm)
        };

        match self.command {
            Commands::Login(args) => auth::login(args, state, out).await,
            Commands::Signup(args) => auth::signup(args, state, out).await,
            Commands::Logout => auth::logout(state, out).await,
            Commands::Whoami => auth::whoami(state, out),
            Commands::Home(args) => shell::home(args, state, out).await,
            Commands::Nav(args) => shell::nav(args, state, out).await,
            Commands::Theme => shell::toggle_theme(state, out),
            Commands::Sidebar => shell::toggle_sidebar(state, out),
            Commands::Bookings(command) => bookings::run(command, state, confirm.as_ref(), out).await,
            Commands::Countries(command) => countries::run(command, state, confirm.as_ref(), out).await,
            Commands::Settings(command) => settings::run(command, state, confirm.as_ref(), out).await,
        }
    }
}

/// Asks on the terminal; anything but `y`/`yes` declines.
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("{} [y/N] ", prompt);
        let _ = io::stderr().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

async fn load<F: EntityForm>(list: &mut EntityList<F>, noun: &str) -> Result<(), AppError> {
    match list.load().await {
        LoadOutcome::Loaded(_) => Ok(()),
        LoadOutcome::Failed => Err(AppError::Backend(format!("Could not load {}", noun))),
        LoadOutcome::Cancelled => Err(AppError::Backend("Cancelled".into())),
    }
}

async fn save<F: EntityForm>(
    list: &mut EntityList<F>,
    noun: &str,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    match list.submit().await {
        SubmitOutcome::Saved => {
            writeln!(out, "Saved {}", noun)?;
            Ok(())
        }
        SubmitOutcome::Invalid(e) => Err(AppError::Validation(e.to_string())),
        SubmitOutcome::Failed => Err(AppError::Backend(format!("Could not save {}", noun))),
        SubmitOutcome::NoEditor => Err(AppError::Backend(format!("No {} editor open", noun))),
    }
}

/// Opens a blank editor, lets `fill` set the fields and submits.
async fn create<F: EntityForm>(
    list: &mut EntityList<F>,
    noun: &str,
    fill: impl FnOnce(&mut F),
    out: &mut dyn Write,
) -> Result<(), AppError> {
    if list.editor().is_none() {
        list.open_editor(None);
    }
    if let Some(form) = list.form_mut() {
        fill(form);
    }
    save(list, noun, out).await
}

/// Loads the list, opens the row `id` for editing, applies `fill` and submits.
async fn update<F: EntityForm>(
    list: &mut EntityList<F>,
    noun: &str,
    id: Uuid,
    fill: impl FnOnce(&mut F),
    out: &mut dyn Write,
) -> Result<(), AppError> {
    load(list, noun).await?;
    let existing = list
        .get(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("{} {}", noun, id)))?;
    list.open_editor(Some(&existing));
    if let Some(form) = list.form_mut() {
        fill(form);
    }
    save(list, noun, out).await
}

async fn delete<F: EntityForm>(
    list: &mut EntityList<F>,
    noun: &str,
    id: Uuid,
    confirm: &dyn Confirm,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    match list.delete(id, confirm).await {
        DeleteOutcome::Deleted => writeln!(out, "Deleted {} {}", noun, id)?,
        DeleteOutcome::Declined => writeln!(out, "Kept {} {}", noun, id)?,
        DeleteOutcome::Failed => {
            return Err(AppError::Backend(format!("Could not delete {}", noun)))
        }
    }
    Ok(())
}
