use kameo::Actor;
use kameo::actor::ActorRef;
use kameo::error::Infallible;
use scylla::client::session::Session;
use scylla_cdc::log_reader::CDCLogReaderBuilder;
use std::sync::Arc;
use crate::actors::core::HealthStatus;
use crate::change_feed::OrderFeedConsumerFactory;
use crate::dispatcher::Dispatcher;
use crate::metrics::Metrics;
use super::{HealthMonitorActor, UpdateHealth};

// ============================================================================
// Change Feed Processor Actor - Streams the orders CDC log
// ============================================================================
//
// Uses the scylla-cdc library to follow the CDC log of the orders table:
//
// 1. STREAMING: rows arrive as they are written, no polling of the base table
// 2. GENERATION HANDLING: the library follows CDC generation changes
// 3. ORDERED DELIVERY: rows of a stream arrive in write order
//
// Every consumer owns a ChangeAssembler and shares the Dispatcher, so one
// write to the orders table becomes one notification round.
//
// ============================================================================

const COMPONENT: &str = "change_feed";

pub struct ChangeFeedProcessor {
    session: Arc<Session>,
    keyspace: String,
    table: String,
    dispatcher: Arc<Dispatcher>,
    metrics: Arc<Metrics>,
    health_monitor: ActorRef<HealthMonitorActor>,
}

impl ChangeFeedProcessor {
    pub fn new(
        session: Arc<Session>,
        keyspace: impl Into<String>,
        table: impl Into<String>,
        dispatcher: Arc<Dispatcher>,
        metrics: Arc<Metrics>,
        health_monitor: ActorRef<HealthMonitorActor>,
    ) -> Self {
        Self {
            session,
            keyspace: keyspace.into(),
            table: table.into(),
            dispatcher,
            metrics,
            health_monitor,
        }
    }

    /// Start the CDC log reader and keep it running in the background
    async fn start_streaming(
        session: Arc<Session>,
        keyspace: String,
        table: String,
        dispatcher: Arc<Dispatcher>,
        metrics: Arc<Metrics>,
        health_monitor: ActorRef<HealthMonitorActor>,
    ) -> anyhow::Result<()> {
        tracing::info!("🔄 Starting CDC streaming for {}.{}", keyspace, table);

        let factory = Arc::new(OrderFeedConsumerFactory::new(dispatcher, metrics));

        // Reads from "now" on; earlier writes are not replayed
        let (reader, handle) = CDCLogReaderBuilder::new()
            .session(session)
            .keyspace(&keyspace)
            .table_name(&table)
            .consumer_factory(factory)
            .build()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create CDC log reader: {}", e))?;

        tracing::info!("✅ CDC log reader started, listening for changes to {}.{}", keyspace, table);
        report(&health_monitor, HealthStatus::Healthy, "streaming").await;

        tokio::spawn(async move {
            // The reader must outlive the handle
            let _reader = reader;
            match handle.await {
                Ok(_) => {
                    tracing::info!("CDC reader completed");
                    report(&health_monitor, HealthStatus::Degraded("reader stopped".to_string()), "completed").await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "CDC reader failed");
                    report(&health_monitor, HealthStatus::Unhealthy(e.to_string()), "failed").await;
                }
            }
        });

        Ok(())
    }
}

async fn report(health_monitor: &ActorRef<HealthMonitorActor>, status: HealthStatus, details: &str) {
    let update = UpdateHealth {
        component: COMPONENT.to_string(),
        status,
        details: Some(details.to_string()),
    };
    if health_monitor.tell(update).await.is_err() {
        tracing::warn!("Health monitor unavailable, change feed health not reported");
    }
}

impl Actor for ChangeFeedProcessor {
    type Args = Self;
    type Error = Infallible;

    async fn on_start(
        state: Self::Args,
        _actor_ref: ActorRef<Self>
    ) -> Result<Self, Self::Error> {
        tracing::info!("ChangeFeedProcessor actor started");

        let session = state.session.clone();
        let keyspace = state.keyspace.clone();
        let table = state.table.clone();
        let dispatcher = state.dispatcher.clone();
        let metrics = state.metrics.clone();
        let health_monitor = state.health_monitor.clone();

        tokio::spawn(async move {
            let result = ChangeFeedProcessor::start_streaming(
                session,
                keyspace,
                table,
                dispatcher,
                metrics,
                health_monitor.clone(),
            )
            .await;

            if let Err(e) = result {
                tracing::error!("Failed to start CDC streaming: {}", e);
                report(&health_monitor, HealthStatus::Unhealthy(e.to_string()), "startup failed").await;
            }
        });

        Ok(state)
    }
}
