use std::sync::Arc;
use std::time::Instant;

use crate::change_feed::OrderChange;
use crate::metrics::Metrics;
use crate::notifiers::{
    DispatchOutcome, DispatchReport, OrderCreatedNotifier, OrderStatusChangedNotifier,
    PushSender, UserDirectory,
};

// ============================================================================
// Dispatcher - Routes order changes to the matching notifier
// ============================================================================

pub struct Dispatcher {
    created: OrderCreatedNotifier,
    status_changed: OrderStatusChangedNotifier,
    metrics: Arc<Metrics>,
}

impl Dispatcher {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        push: Arc<dyn PushSender>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            created: OrderCreatedNotifier::new(users.clone(), push.clone()),
            status_changed: OrderStatusChangedNotifier::new(users, push),
            metrics,
        }
    }

    pub async fn handle(&self, change: &OrderChange) -> DispatchReport {
        self.metrics.record_order_change(change.kind());
        let started = Instant::now();

        let report = match change {
            OrderChange::Created(order) => self.created.notify(order).await,
            OrderChange::Updated { before, after } => {
                self.status_changed.notify(before, after).await
            }
        };

        let kind = report.kind.as_str();
        self.metrics.observe_dispatch(kind, started.elapsed().as_secs_f64());
        for recipient in &report.outcomes {
            self.metrics.record_notification(kind, recipient.outcome.label());
        }

        if report.failed() > 0 {
            let errors: Vec<String> = report
                .outcomes
                .iter()
                .filter_map(|o| match &o.outcome {
                    DispatchOutcome::Failed(e) => Some(e.to_string()),
                    _ => None,
                })
                .collect();
            tracing::warn!(
                order_id = %report.order_id,
                kind = %report.kind,
                sent = report.sent(),
                failed = report.failed(),
                errors = ?errors,
                "⚠️ Some notifications could not be delivered"
            );
        } else if !report.outcomes.is_empty() {
            tracing::info!(
                order_id = %report.order_id,
                kind = %report.kind,
                recipients = report.outcomes.len(),
                sent = report.sent(),
                "✅ Order change handled"
            );
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Order, OrderItem, OrderStatus};
    use crate::notifiers::testing::{InMemoryUsers, RecordingPush};
    use crate::notifiers::NotificationKind;
    use uuid::Uuid;

    fn order(farmers: &[Uuid], status: &str) -> Order {
        Order {
            id: Uuid::new_v4(),
            consumer_id: Uuid::new_v4(),
            items: farmers
                .iter()
                .map(|f| OrderItem {
                    farmer_id: *f,
                    product_id: Uuid::new_v4(),
                    product_name: None,
                    quantity: 2,
                })
                .collect(),
            status: Some(OrderStatus::new(status)),
        }
    }

    #[tokio::test]
    async fn test_created_change_goes_to_farmers() {
        let farmer = Uuid::new_v4();
        let users = Arc::new(InMemoryUsers::default().with_token(farmer, "farmer-token"));
        let push = Arc::new(RecordingPush::default());
        let metrics = Arc::new(Metrics::new().unwrap());
        let dispatcher = Dispatcher::new(users, push.clone(), metrics.clone());

        let report = dispatcher
            .handle(&OrderChange::Created(order(&[farmer], "pending")))
            .await;

        assert_eq!(report.kind, NotificationKind::OrderPlaced);
        assert_eq!(push.tokens(), vec!["farmer-token"]);
        assert_eq!(metrics.order_changes.with_label_values(&["created"]).get(), 1);
        assert_eq!(
            metrics.notifications.with_label_values(&["order_placed", "sent"]).get(),
            1
        );
    }

    #[tokio::test]
    async fn test_updated_change_goes_to_consumer() {
        let before = order(&[Uuid::new_v4()], "pending");
        let after = Order {
            status: Some(OrderStatus::new("shipped")),
            ..before.clone()
        };
        let users = Arc::new(InMemoryUsers::default().with_token(after.consumer_id, "consumer-token"));
        let push = Arc::new(RecordingPush::default());
        let metrics = Arc::new(Metrics::new().unwrap());
        let dispatcher = Dispatcher::new(users, push.clone(), metrics.clone());

        let report = dispatcher
            .handle(&OrderChange::Updated { before, after })
            .await;

        assert_eq!(report.kind, NotificationKind::OrderStatus);
        assert_eq!(push.tokens(), vec!["consumer-token"]);
        assert_eq!(metrics.order_changes.with_label_values(&["updated"]).get(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_counted_per_recipient() {
        let (down, no_token) = (Uuid::new_v4(), Uuid::new_v4());
        let users = Arc::new(InMemoryUsers::default().unreachable(down).without_token(no_token));
        let push = Arc::new(RecordingPush::default());
        let metrics = Arc::new(Metrics::new().unwrap());
        let dispatcher = Dispatcher::new(users, push, metrics.clone());

        let report = dispatcher
            .handle(&OrderChange::Created(order(&[down, no_token], "pending")))
            .await;

        assert_eq!(report.failed(), 1);
        assert_eq!(
            metrics.notifications.with_label_values(&["order_placed", "lookup_failed"]).get(),
            1
        );
        assert_eq!(
            metrics.notifications.with_label_values(&["order_placed", "skipped_no_token"]).get(),
            1
        );
    }
}
