//! Portal server — application entry point.

use egram_db::{DbConfig, DbManager};
use tracing_subscriber::EnvFilter;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("egram=info".parse().unwrap()))
        .json()
        .init();

    tracing::info!("Starting E-Gram Panchayat portal server...");

    let defaults = DbConfig::default();
    let config = DbConfig {
        url: env_or("EGRAM_DB_URL", &defaults.url),
        namespace: env_or("EGRAM_DB_NAMESPACE", &defaults.namespace),
        database: env_or("EGRAM_DB_DATABASE", &defaults.database),
        username: env_or("EGRAM_DB_USER", &defaults.username),
        password: env_or("EGRAM_DB_PASSWORD", &defaults.password),
    };

    let manager = match DbManager::connect(&config).await {
        Ok(manager) => manager,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to SurrealDB");
            std::process::exit(1);
        }
    };

    if let Err(e) = egram_db::run_migrations(manager.client()).await {
        tracing::error!(error = %e, "Schema migrations failed");
        std::process::exit(1);
    }

    // TODO: mount the web UI layer's HTTP surface over the portal flows

    tracing::info!("Portal server stopped.");
}
