use clap::Parser;
use lodge_app::{cli::Cli, error::AppError, state::AppState};
use lodge_store::app_config::Config;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lodge_app=info,lodge_views=info,lodge_store=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(err.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = Config::load()?;
    tracing::debug!("Loaded config for {}", config.backend.url);

    let mut state = AppState::connect(config).await?;
    let mut stdout = io::stdout();
    cli.run(&mut state, &mut stdout).await
}
