use serde::Serialize;
use std::fmt;

use crate::models::{DeviceToken, Order, OrderId, OrderStatus, UserId};

// ============================================================================
// Notification Payloads
// ============================================================================

pub const ORDER_PLACED_TITLE: &str = "New Order Received";
pub const ORDER_STATUS_TITLE: &str = "Order Status Updated";

/// Value of the `type` metadata key the mobile app switches on
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    OrderPlaced,
    OrderStatus,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::OrderPlaced => "order_placed",
            NotificationKind::OrderStatus => "order_status",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification addressed to a user, before the device token is known
#[derive(Clone, Debug, PartialEq)]
pub struct DispatchRequest {
    pub recipient: UserId,
    pub kind: NotificationKind,
    pub order_id: OrderId,
    pub title: String,
    pub body: String,
}

impl DispatchRequest {
    pub fn order_placed(order: &Order, farmer_id: UserId) -> Self {
        Self {
            recipient: farmer_id,
            kind: NotificationKind::OrderPlaced,
            order_id: order.id,
            title: ORDER_PLACED_TITLE.to_string(),
            body: format!("Order #{} includes your products!", order.id),
        }
    }

    pub fn order_status(order: &Order, status: &OrderStatus) -> Self {
        Self {
            recipient: order.consumer_id,
            kind: NotificationKind::OrderStatus,
            order_id: order.id,
            title: ORDER_STATUS_TITLE.to_string(),
            body: format!("Your order #{} is now {}", order.id, status),
        }
    }

    /// Address the request to a concrete device.
    pub fn into_payload(self, token: DeviceToken) -> NotificationPayload {
        NotificationPayload {
            notification: NotificationContent {
                title: self.title,
                body: self.body,
            },
            data: NotificationData {
                kind: self.kind,
                order_id: self.order_id,
            },
            token,
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct NotificationData {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(rename = "orderId")]
    pub order_id: OrderId,
}

/// Wire shape of a single push message
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct NotificationPayload {
    pub notification: NotificationContent,
    pub data: NotificationData,
    pub token: DeviceToken,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn order() -> Order {
        Order {
            id: Uuid::new_v4(),
            consumer_id: Uuid::new_v4(),
            items: vec![],
            status: Some(OrderStatus::new("pending")),
        }
    }

    #[test]
    fn test_order_placed_request() {
        let order = order();
        let farmer = Uuid::new_v4();
        let request = DispatchRequest::order_placed(&order, farmer);

        assert_eq!(request.recipient, farmer);
        assert_eq!(request.kind, NotificationKind::OrderPlaced);
        assert_eq!(request.title, "New Order Received");
        assert_eq!(request.body, format!("Order #{} includes your products!", order.id));
    }

    #[test]
    fn test_order_status_request_names_new_status() {
        let order = order();
        let request = DispatchRequest::order_status(&order, &OrderStatus::new("shipped"));

        assert_eq!(request.recipient, order.consumer_id);
        assert_eq!(request.title, "Order Status Updated");
        assert_eq!(request.body, format!("Your order #{} is now shipped", order.id));
    }

    #[test]
    fn test_payload_wire_field_names() {
        let order = order();
        let payload = DispatchRequest::order_placed(&order, Uuid::new_v4())
            .into_payload(DeviceToken::parse("device-1").unwrap());

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["notification"]["title"], "New Order Received");
        assert!(json["notification"]["body"].is_string());
        assert_eq!(json["data"]["type"], "order_placed");
        assert_eq!(json["data"]["orderId"], order.id.to_string());
        assert_eq!(json["token"], "device-1");
    }

    #[test]
    fn test_kind_serializes_like_as_str() {
        for kind in [NotificationKind::OrderPlaced, NotificationKind::OrderStatus] {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, kind.as_str());
        }
    }
}
