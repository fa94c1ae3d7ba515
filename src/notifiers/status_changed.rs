use std::sync::Arc;

use crate::models::Order;
use super::delivery::deliver;
use super::outcome::DispatchReport;
use super::payload::{DispatchRequest, NotificationKind};
use super::ports::{PushSender, UserDirectory};

/// Tells the consumer when their order moves to a different status.
pub struct OrderStatusChangedNotifier {
    users: Arc<dyn UserDirectory>,
    push: Arc<dyn PushSender>,
}

impl OrderStatusChangedNotifier {
    pub fn new(users: Arc<dyn UserDirectory>, push: Arc<dyn PushSender>) -> Self {
        Self { users, push }
    }

    /// A request for the consumer iff the status value differs.
    ///
    /// A status that was cleared has nothing to announce.
    pub fn plan(before: &Order, after: &Order) -> Option<DispatchRequest> {
        let new_status = after.status.as_ref()?;
        if before.status.as_ref() == Some(new_status) {
            return None;
        }
        Some(DispatchRequest::order_status(after, new_status))
    }

    pub async fn notify(&self, before: &Order, after: &Order) -> DispatchReport {
        let Some(request) = Self::plan(before, after) else {
            tracing::debug!(order_id = %after.id, "Status unchanged, nothing to notify");
            return DispatchReport::empty(after.id, NotificationKind::OrderStatus);
        };

        tracing::debug!(
            order_id = %after.id,
            consumer_id = %after.consumer_id,
            from = ?before.status,
            to = ?after.status,
            "Order status changed"
        );

        let outcome = deliver(self.users.as_ref(), self.push.as_ref(), request).await;

        DispatchReport {
            order_id: after.id,
            kind: NotificationKind::OrderStatus,
            outcomes: vec![outcome],
        }
    }
}
