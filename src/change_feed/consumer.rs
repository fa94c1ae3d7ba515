use async_trait::async_trait;
use scylla_cdc::consumer::{CDCRow, Consumer, ConsumerFactory};
use std::sync::Arc;

use crate::dispatcher::Dispatcher;
use crate::metrics::Metrics;
use super::assembler::ChangeAssembler;
use super::row::ChangeRow;

/// Consumes the CDC log of the orders table and dispatches notifications
pub struct OrderFeedConsumer {
    assembler: ChangeAssembler,
    dispatcher: Arc<Dispatcher>,
    metrics: Arc<Metrics>,
}

impl OrderFeedConsumer {
    pub fn new(dispatcher: Arc<Dispatcher>, metrics: Arc<Metrics>) -> Self {
        Self {
            assembler: ChangeAssembler::new(),
            dispatcher,
            metrics,
        }
    }
}

#[async_trait]
impl Consumer for OrderFeedConsumer {
    async fn consume_cdc(&mut self, data: CDCRow<'_>) -> anyhow::Result<()> {
        tracing::trace!(
            stream_id = ?data.stream_id,
            operation = %data.operation,
            batch_seq_no = data.batch_seq_no,
            "Received CDC row"
        );

        let row = ChangeRow::from_cdc(&data);

        // Bad rows are dropped, never returned: an error here would stall the stream
        match self.assembler.push(row) {
            Ok(Some(change)) => {
                tracing::debug!(
                    order_id = %change.order_id(),
                    kind = change.kind(),
                    "📥 Order change assembled"
                );
                self.dispatcher.handle(&change).await;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(error = %e, "❌ Dropping undecodable order change");
                self.metrics.record_decode_failure();
            }
        }

        Ok(())
    }
}

/// The scylla-cdc library creates one consumer per stream group
pub struct OrderFeedConsumerFactory {
    dispatcher: Arc<Dispatcher>,
    metrics: Arc<Metrics>,
}

impl OrderFeedConsumerFactory {
    pub fn new(dispatcher: Arc<Dispatcher>, metrics: Arc<Metrics>) -> Self {
        Self { dispatcher, metrics }
    }
}

#[async_trait]
impl ConsumerFactory for OrderFeedConsumerFactory {
    async fn new_consumer(&self) -> Box<dyn Consumer> {
        tracing::debug!("Creating new OrderFeedConsumer instance");
        Box::new(OrderFeedConsumer::new(self.dispatcher.clone(), self.metrics.clone()))
    }
}
