use std::str::FromStr;

use anyhow::Context;
use cron::Schedule;
use dotenvy::dotenv;
use tokio::sync::broadcast;

use shelfwise::jobs::{OverdueNotifier, spawn_overdue_scheduler};
use shelfwise::logging::init_tracing;
use shelfwise::metrics::{init_metrics, metrics_app};
use shelfwise::router::init_router;
use shelfwise::shelfwise_config::SchedulerConfig;
use shelfwise::shelfwise_db::run_migrations;
use shelfwise::state::init_app_state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing().context("Failed to create log directory")?;

    let state = init_app_state().await?;
    run_migrations(&state.db).await?;

    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    if state.server_config.metrics_enabled {
        let handle = init_metrics()?;
        let metrics_addr = format!("{}:{}", state.server_config.host, state.server_config.metrics_port);
        let listener = tokio::net::TcpListener::bind(&metrics_addr).await?;
        tracing::info!("Metrics available at http://{}/metrics", metrics_addr);
        tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, metrics_app(handle)).await {
                tracing::error!(error = %err, "Metrics server stopped");
            }
        });
    }

    let scheduler_config = SchedulerConfig::from_env();
    let scheduler = if scheduler_config.overdue_scan_enabled {
        let schedule = Schedule::from_str(&scheduler_config.overdue_scan_cron)
            .with_context(|| format!("Invalid OVERDUE_SCAN_CRON: {}", scheduler_config.overdue_scan_cron))?;
        let notifier = OverdueNotifier::new(state.db.clone(), state.mailer.clone());
        Some(spawn_overdue_scheduler(notifier, schedule, shutdown_tx.subscribe()))
    } else {
        tracing::info!("Overdue scan disabled");
        None
    };

    let address = state.server_config.bind_address();
    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Server running on http://{}", address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", address);
    tracing::info!("Scalar UI available at http://{}/scalar", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(());
    if let Some(handle) = scheduler {
        let _ = handle.await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
}
