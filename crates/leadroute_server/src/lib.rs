//! HTTP surface for lead routing.
//!
//! # Responsibility
//! - Expose admin and intake use-cases of `leadroute_core` over JSON/HTTP.
//! - Own process configuration and server lifecycle.
//!
//! # Invariants
//! - Every request works on its own SQLite connection, opened and dropped
//!   inside a blocking task.

pub mod api;
pub mod config;
pub mod error;
pub mod state;

pub use api::router;
pub use config::ServerConfig;
pub use error::ApiError;
pub use state::AppState;

use anyhow::Context;
use log::info;

/// Migrates the database, binds the listener and serves until Ctrl-C.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    // Fail fast on an unusable or too-new database before accepting traffic.
    leadroute_core::db::open_db(&config.db_path)
        .with_context(|| format!("failed to open database `{}`", config.db_path.display()))?;

    let app = router(AppState::new(config.db_path.clone()));
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    info!(
        "event=server_start module=server status=ok bind={} db_path={}",
        config.bind,
        config.db_path.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!(
            "event=server_stop module=server status=error error_code=signal_failed error={}",
            err
        );
    }
}
