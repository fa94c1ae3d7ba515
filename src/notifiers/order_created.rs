use futures_util::future::join_all;
use std::sync::Arc;

use crate::models::Order;
use super::delivery::deliver;
use super::outcome::DispatchReport;
use super::payload::{DispatchRequest, NotificationKind};
use super::ports::{PushSender, UserDirectory};

/// Tells every farmer whose products appear in a new order.
pub struct OrderCreatedNotifier {
    users: Arc<dyn UserDirectory>,
    push: Arc<dyn PushSender>,
}

impl OrderCreatedNotifier {
    pub fn new(users: Arc<dyn UserDirectory>, push: Arc<dyn PushSender>) -> Self {
        Self { users, push }
    }

    /// One request per distinct farmer referenced by the line items.
    pub fn plan(order: &Order) -> Vec<DispatchRequest> {
        order
            .farmer_ids()
            .into_iter()
            .map(|farmer_id| DispatchRequest::order_placed(order, farmer_id))
            .collect()
    }

    /// Fans out to all farmers concurrently and gathers one outcome each.
    pub async fn notify(&self, order: &Order) -> DispatchReport {
        let requests = Self::plan(order);

        tracing::debug!(
            order_id = %order.id,
            items = order.items.len(),
            farmers = requests.len(),
            "Notifying farmers of new order"
        );

        let outcomes = join_all(
            requests
                .into_iter()
                .map(|request| deliver(self.users.as_ref(), self.push.as_ref(), request)),
        )
        .await;

        DispatchReport {
            order_id: order.id,
            kind: NotificationKind::OrderPlaced,
            outcomes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderItem, OrderStatus};
    use crate::notifiers::testing::{InMemoryUsers, RecordingPush};
    use crate::notifiers::{DispatchError, DispatchOutcome};
    use uuid::Uuid;

    fn order_with_farmers(farmers: &[Uuid]) -> Order {
        Order {
            id: Uuid::new_v4(),
            consumer_id: Uuid::new_v4(),
            items: farmers
                .iter()
                .map(|farmer_id| OrderItem {
                    farmer_id: *farmer_id,
                    product_id: Uuid::new_v4(),
                    product_name: Some("Carrots".to_string()),
                    quantity: 1,
                })
                .collect(),
            status: Some(OrderStatus::new("pending")),
        }
    }

    fn notifier(users: Arc<InMemoryUsers>, push: Arc<RecordingPush>) -> OrderCreatedNotifier {
        OrderCreatedNotifier::new(users, push)
    }

    #[test]
    fn test_plan_one_request_per_distinct_farmer() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let order = order_with_farmers(&[a, b, a, c]);

        let recipients: Vec<Uuid> = OrderCreatedNotifier::plan(&order)
            .into_iter()
            .map(|r| r.recipient)
            .collect();

        assert_eq!(recipients, vec![a, b, c]);
    }

    #[tokio::test]
    async fn test_duplicate_farmers_notified_once() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let users = Arc::new(
            InMemoryUsers::default()
                .with_token(a, "token-a")
                .with_token(b, "token-b")
                .with_token(c, "token-c"),
        );
        let push = Arc::new(RecordingPush::default());
        let order = order_with_farmers(&[a, b, a, c]);

        let report = notifier(users, push.clone()).notify(&order).await;

        let mut tokens = push.tokens();
        tokens.sort();
        assert_eq!(tokens, vec!["token-a", "token-b", "token-c"]);
        assert_eq!(report.sent(), 3);
        assert_eq!(report.outcomes.len(), 3);
    }

    #[tokio::test]
    async fn test_payload_content() {
        let farmer = Uuid::new_v4();
        let users = Arc::new(InMemoryUsers::default().with_token(farmer, "token-f"));
        let push = Arc::new(RecordingPush::default());
        let order = order_with_farmers(&[farmer]);

        notifier(users, push.clone()).notify(&order).await;

        let sent = push.attempts();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].notification.title, "New Order Received");
        assert!(sent[0].notification.body.contains(&order.id.to_string()));
        assert_eq!(sent[0].data.kind, NotificationKind::OrderPlaced);
        assert_eq!(sent[0].data.order_id, order.id);
    }

    #[tokio::test]
    async fn test_farmer_without_token_is_skipped() {
        let (with_token, without_token) = (Uuid::new_v4(), Uuid::new_v4());
        let users = Arc::new(
            InMemoryUsers::default()
                .with_token(with_token, "token-1")
                .without_token(without_token),
        );
        let push = Arc::new(RecordingPush::default());
        let order = order_with_farmers(&[with_token, without_token]);

        let report = notifier(users, push.clone()).notify(&order).await;

        assert_eq!(push.tokens(), vec!["token-1"]);
        assert_eq!(report.outcome_for(without_token), Some(&DispatchOutcome::SkippedNoToken));
        assert_eq!(report.failed(), 0);
    }

    #[tokio::test]
    async fn test_unknown_farmer_is_skipped() {
        let ghost = Uuid::new_v4();
        let users = Arc::new(InMemoryUsers::default());
        let push = Arc::new(RecordingPush::default());

        let report = notifier(users, push.clone()).notify(&order_with_farmers(&[ghost])).await;

        assert!(push.attempts().is_empty());
        assert_eq!(report.outcome_for(ghost), Some(&DispatchOutcome::SkippedUnknownUser));
    }

    #[tokio::test]
    async fn test_empty_items_dispatch_nothing() {
        let users = Arc::new(InMemoryUsers::default());
        let push = Arc::new(RecordingPush::default());

        let report = notifier(users.clone(), push.clone())
            .notify(&order_with_farmers(&[]))
            .await;

        assert!(report.outcomes.is_empty());
        assert!(users.lookups().is_empty());
        assert!(push.attempts().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_failure_does_not_block_other_farmers() {
        let (down, ok) = (Uuid::new_v4(), Uuid::new_v4());
        let users = Arc::new(
            InMemoryUsers::default()
                .unreachable(down)
                .with_token(ok, "token-ok"),
        );
        let push = Arc::new(RecordingPush::default());

        let report = notifier(users, push.clone())
            .notify(&order_with_farmers(&[down, ok]))
            .await;

        assert_eq!(push.tokens(), vec!["token-ok"]);
        assert!(matches!(
            report.outcome_for(down),
            Some(DispatchOutcome::Failed(DispatchError::Lookup { .. }))
        ));
        assert!(matches!(report.outcome_for(ok), Some(DispatchOutcome::Sent { .. })));
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_block_other_farmers() {
        let (rejected, ok) = (Uuid::new_v4(), Uuid::new_v4());
        let users = Arc::new(
            InMemoryUsers::default()
                .with_token(rejected, "stale-token")
                .with_token(ok, "token-ok"),
        );
        let push = Arc::new(RecordingPush::default().rejecting("stale-token"));

        let report = notifier(users, push.clone())
            .notify(&order_with_farmers(&[rejected, ok]))
            .await;

        // Both were attempted even though one was rejected
        assert_eq!(push.attempts().len(), 2);
        assert_eq!(report.sent(), 1);
        assert_eq!(report.failed(), 1);
        assert!(matches!(
            report.outcome_for(rejected),
            Some(DispatchOutcome::Failed(DispatchError::Delivery { .. }))
        ));
    }
}
