use kameo::Actor;
use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod models;
mod actors;
mod change_feed;
mod config;
mod dispatcher;
mod messaging;
mod metrics;
mod notifiers;
mod store;
mod utils;

use actors::{ChangeFeedProcessor, HealthMonitorActor};
use config::Settings;
use dispatcher::Dispatcher;
use messaging::FcmClient;
use store::ScyllaUserDirectory;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,order_notifier=debug"))
        )
        .init();

    tracing::info!("🚀 Starting order notifier");

    let settings = Settings::from_env()?;

    // === 1. Create ScyllaDB Session ===
    tracing::info!(nodes = ?settings.scylla.nodes, "Connecting to ScyllaDB...");
    let session: Session = SessionBuilder::new()
        .known_nodes(&settings.scylla.nodes)
        .build()
        .await?;

    if settings.scylla.bootstrap_schema {
        store::ensure_schema(&session, &settings.scylla).await?;
    }

    let session = Arc::new(session);

    // === 2. Initialize Prometheus metrics ===
    let metrics = Arc::new(metrics::Metrics::new()?);
    tracing::info!("📊 Metrics registry created with {} metrics", metrics.registry().gather().len());

    // === 3. Push client and health monitor ===
    let fcm = Arc::new(FcmClient::new(&settings.fcm)?);
    let health_monitor = HealthMonitorActor::spawn(
        HealthMonitorActor::new(fcm.circuit_breaker(), metrics.clone()),
    );

    // Metrics HTTP server runs on its own thread and runtime
    let metrics_registry = Arc::new(metrics.registry().clone());
    let metrics_port = settings.metrics_port;
    let server_health = health_monitor.clone();
    std::thread::spawn(move || {
        let result = actix_web::rt::System::new().block_on(metrics::start_metrics_server(
            metrics_registry,
            server_health,
            metrics_port,
        ));
        if let Err(e) = result {
            tracing::error!("Metrics server error: {}", e);
        }
    });

    // === 4. Notifiers ===
    let users = Arc::new(
        ScyllaUserDirectory::new(
            session.clone(),
            &settings.scylla.keyspace,
            &settings.scylla.users_table,
        )
        .await?,
    );
    let dispatcher = Arc::new(Dispatcher::new(users, fcm, metrics.clone()));

    // === 5. Follow the orders change feed ===
    let _change_feed = ChangeFeedProcessor::spawn(ChangeFeedProcessor::new(
        session.clone(),
        settings.scylla.keyspace.clone(),
        settings.scylla.orders_table.clone(),
        dispatcher,
        metrics.clone(),
        health_monitor.clone(),
    ));

    tracing::info!("⏳ Watching {}.{} for order changes", settings.scylla.keyspace, settings.scylla.orders_table);

    tokio::signal::ctrl_c().await?;
    tracing::info!("🛑 Shutdown signal received, stopping");

    Ok(())
}
