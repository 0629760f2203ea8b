// Entry point for the deletion tracker

use anyhow::{Context, Result};
use deletion_tracker::{FileAuditSink, HttpPageSource, Tracker, TrackerConfig};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,deletion_tracker=debug,reqwest=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = TrackerConfig::from_env().context("Failed to load configuration")?;
    tracing::info!(
        sections = ?config.sections,
        audit_log = %config.audit_log_path.display(),
        "Configuration loaded"
    );

    let source = Arc::new(HttpPageSource::new(&config)?);
    let sink = Arc::new(FileAuditSink::new(config.audit_log_path.clone()));

    let shutdown = CancellationToken::new();
    let handle = Tracker::new(config, source, sink).spawn(shutdown.clone())?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    tracing::info!("received shutdown signal");

    handle.shutdown_and_join().await?;
    tracing::info!("tracker stopped");
    Ok(())
}
