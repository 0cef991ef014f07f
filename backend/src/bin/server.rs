//! Flight Schedules HTTP Server Binary
//!
//! Main entry point for the schedule REST API. It builds the repository,
//! sets up the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Run with the flight catalog seeded from ./repository.toml
//! cargo run --bin flight-schedules-server
//!
//! # Run with an explicit configuration file
//! REPOSITORY_CONFIG=/etc/flights/repository.toml cargo run --bin flight-schedules-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `REPOSITORY_CONFIG`: Path to the repository TOML file
//! - `REPOSITORY_TYPE`: Backend used when no TOML file is found (default: local)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use flight_schedules::db::{FullRepository, RepositoryFactory};
use flight_schedules::http::{create_router, AppState};

fn build_repository() -> anyhow::Result<Arc<dyn FullRepository>> {
    if let Ok(path) = env::var("REPOSITORY_CONFIG") {
        info!("Loading repository configuration from {}", path);
        return Ok(RepositoryFactory::from_config_file(&path)?);
    }

    match RepositoryFactory::from_default_config() {
        Ok(repository) => Ok(repository),
        Err(e) => {
            warn!("{}; starting with an empty flight catalog", e);
            Ok(RepositoryFactory::from_env())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting flight schedules HTTP server");

    let repository = build_repository()?;
    info!("Repository initialized successfully");

    let state = AppState::new(repository);
    let app = create_router(state);

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
