//! Tictactoe Arena - server entrypoint.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use tictactoe_arena::{GameRepository, GameService};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            port,
            host,
            db_path,
        } => run_server(host, port, db_path).await,
        Command::Migrate { db_path } => run_migrations(db_path),
    }
}

/// Run the HTTP game server
async fn run_server(host: String, port: u16, db_path: String) -> Result<()> {
    info!(db_path = %db_path, "Starting Tictactoe Arena server");

    let repository = GameRepository::new(db_path)?;
    repository.run_migrations()?;

    let service = GameService::new(repository);
    let app = tictactoe_arena::router(service);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!("Server ready at http://{host}:{port}/");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Apply pending migrations and exit
fn run_migrations(db_path: String) -> Result<()> {
    let repository = GameRepository::new(db_path)?;
    repository.run_migrations()?;
    info!("Migrations applied");
    Ok(())
}
