//! Explore worker entry point.
//!
//! Connects to the store, applies migrations and keeps the cached analytics
//! of the Explore feed fresh until it is asked to stop.

use std::sync::Arc;

use explore_common::{Config, build_storage};
use explore_core::{RecomputeService, SweepSchedule, spawn_sweeps};
use explore_db::repositories::{
    ExploreContentRepository, ExploreEngagementRepository, ExploreVideoRepository,
};
use sea_orm::DatabaseConnection;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "explore=debug".into());
    let json = config.logging.json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(fmt::layer))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let config = Config::load()?;
    init_tracing(&config);

    info!("Starting explore worker...");

    let db: Arc<DatabaseConnection> = Arc::new(explore_db::init(&config).await?);
    info!("Connected to database");

    info!("Running database migrations...");
    explore_db::migrate(&db).await?;
    info!("Migrations completed");

    // Sweeps do not need storage, so a bad storage section only disables uploads
    match build_storage(&config.storage) {
        Ok(_) => info!(kind = ?config.storage.kind, "Object storage configured"),
        Err(e) => error!(error = %e, "Object storage is not usable; uploads will be rejected"),
    }

    let recompute = Arc::new(RecomputeService::new(
        ExploreContentRepository::new(Arc::clone(&db)),
        ExploreVideoRepository::new(Arc::clone(&db)),
        ExploreEngagementRepository::new(Arc::clone(&db)),
        config.explore.sweep_concurrency,
    ));

    let schedule = SweepSchedule::from(&config.explore);
    info!(
        score_interval_secs = schedule.score_interval.as_secs(),
        completion_interval_secs = schedule.completion_interval.as_secs(),
        run_on_startup = schedule.run_on_startup,
        "Scheduling recomputation sweeps"
    );
    let handles = spawn_sweeps(&schedule, recompute);

    shutdown_signal().await;

    for handle in handles {
        handle.abort();
    }

    info!("Explore worker shutdown complete");
    Ok(())
}
