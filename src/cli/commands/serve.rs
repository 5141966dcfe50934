use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::database::{DatabaseManager, PgStore};
use crate::router;
use crate::state::AppState;

pub async fn handle(config: AppConfig) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config)
        .await
        .context("failed to connect to the database")?;

    if config.database.run_migrations {
        DatabaseManager::migrate(&pool).await?;
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.api.port));
    tracing::info!("Starting AlerteCompteur API in {:?} mode", config.environment);
    if config.is_development() && std::env::var("SECRET_KEY").is_err() {
        tracing::warn!("SECRET_KEY not set, signing tokens with the development secret");
    }

    let state = AppState::new(Arc::new(PgStore::new(pool.clone())), config);
    let app = router::app(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    DatabaseManager::close(&pool).await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
