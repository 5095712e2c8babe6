//! Trivia application binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Open the SQLite store and seed default categories
//! 3. Start the axum REST API server

mod cli;

use clap::Parser;

use trivia_api::{start_server, AppState};
use trivia_core::config::TriviaConfig;
use trivia_storage::Database;

use crate::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = TriviaConfig::load_or_default(&config_file);
    config.general.port = args.resolve_port(config.general.port);
    config.general.log_level = args.resolve_log_level(&config.general.log_level);
    config.storage.seed_default_categories =
        args.resolve_seed(config.storage.seed_default_categories);

    // Tracing. RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting Trivia v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");
    config.validate()?;

    // Storage.
    let data_dir = args.resolve_data_dir(&config.general.data_dir);
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        tracing::error!(path = %data_dir.display(), error = %e, "Failed to create data directory");
        return Err(e.into());
    }

    let db_path = data_dir.join(&config.storage.db_file);
    let db = Database::new(&db_path)?;
    tracing::info!(path = %db_path.display(), "SQLite database opened");

    if config.storage.seed_default_categories {
        db.seed_default_categories()?;
    }

    // API server.
    let state = AppState::new(config.clone(), db);
    if let Err(e) = start_server(&config, state).await {
        tracing::error!(port = config.general.port, error = %e, "API server stopped");
        tracing::error!("Try: TRIVIA_PORT={} cargo run -p trivia-app", config.general.port.saturating_add(1));
        return Err(e.into());
    }

    Ok(())
}
