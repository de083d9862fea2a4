use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use bodega_api as api;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = api::config::load_config().context("failed to load configuration")?;
    api::config::init_tracing(&cfg.log_level, cfg.log_json);

    // Init DB
    let db = api::db::establish_connection(&cfg)
        .await
        .context("failed to connect to the database")?;
    if cfg.auto_migrate {
        api::db::run_migrations(&db)
            .await
            .context("failed running migrations")?;
    }

    let state = Arc::new(api::AppState::new(Arc::new(db), cfg.clone()));

    let app = api::handlers::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(if cfg.is_development() {
            CorsLayer::permissive()
        } else {
            CorsLayer::new()
        });

    let addr = cfg.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("bodega-api listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!("Failed to install shutdown signal handler: {}", err);
    }
    info!("Shutdown signal received");
}
