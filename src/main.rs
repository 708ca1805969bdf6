//! Browo Engine HTTP server.
//!
//! Environment:
//! - `BROWO_CONFIG_DIR`: configuration directory (default `./config/browo`)
//! - `BROWO_BIND_ADDR`: listen address (default `0.0.0.0:3000`)
//! - `RUST_LOG`: log filter (default `browo_engine=info`)

use std::env;

use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use browo_engine::api::{AppState, create_router};
use browo_engine::config::ConfigLoader;

const DEFAULT_CONFIG_DIR: &str = "./config/browo";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

fn init_logger() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("browo_engine=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .compact(),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();

    let config_dir =
        env::var("BROWO_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let bind_addr =
        env::var("BROWO_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    let config = match ConfigLoader::load(&config_dir) {
        Ok(config) => config,
        Err(err) => {
            error!(config_dir = %config_dir, error = %err, "Failed to load configuration");
            return Err(err.into());
        }
    };
    info!(
        name = %config.metadata().name,
        version = %config.metadata().version,
        carryover_enabled = config.carryover().enabled(),
        cutoff_month = config.carryover().cutoff_month(),
        cutoff_day = config.carryover().cutoff_day(),
        "Configuration loaded"
    );

    let router = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "Browo Engine v{} listening", env!("CARGO_PKG_VERSION"));

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutting down gracefully");
        })
        .await?;

    Ok(())
}
