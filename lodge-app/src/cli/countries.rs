use clap::{Args, Subcommand};
use lodge_core::routing::Route;
use lodge_views::{Confirm, CountriesView};
use std::io::Write;
use uuid::Uuid;

use crate::error::AppError;
use crate::render;
use crate::state::AppState;

#[derive(Debug, Args)]
pub struct CountriesCommand {
    #[command(subcommand)]
    command: CountriesSubcommand,
}

#[derive(Debug, Subcommand)]
enum CountriesSubcommand {
    List {
        #[arg(long, short)]
        search: Option<String>,
    },
    Create {
        #[arg(long)]
        name: String,
        /// Create the country as inactive
        #[arg(long)]
        inactive: bool,
    },
    Update {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    Delete { id: Uuid },
}

pub async fn run(
    command: CountriesCommand,
    state: &mut AppState,
    confirm: &dyn Confirm,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    state.require(Route::Countries)?;
    let mut view = CountriesView::with_lifetime(state.api.clone(), "country", state.view_lifetime());

    match command.command {
        CountriesSubcommand::List { search } => {
            super::load(&mut view, "countries").await?;
            view.set_search(search.unwrap_or_default());
            writeln!(out, "{}", render::countries(&view.filtered()))?;
        }
        CountriesSubcommand::Create { name, inactive } => {
            let fill = |form: &mut lodge_core::forms::CountryForm| {
                form.country_name = name;
                form.is_active = !inactive;
            };
            super::create(&mut view, "country", fill, out).await?;
        }
        CountriesSubcommand::Update { id, name, active } => {
            let fill = |form: &mut lodge_core::forms::CountryForm| {
                if let Some(name) = name {
                    form.country_name = name;
                }
                if let Some(active) = active {
                    form.is_active = active;
                }
            };
            super::update(&mut view, "country", id, fill, out).await?;
        }
        CountriesSubcommand::Delete { id } => {
            super::delete(&mut view, "country", id, confirm, out).await?;
        }
    }
    Ok(())
}
