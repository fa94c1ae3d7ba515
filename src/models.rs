use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Domain Models
// ============================================================================
//
// Orders are written by the ordering flow and users by the registration flow.
// This service only ever reads them.
//
// ============================================================================

pub type OrderId = Uuid;
pub type UserId = Uuid;

#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub consumer_id: UserId,
    pub items: Vec<OrderItem>,
    pub status: Option<OrderStatus>,
}

/// One line of an order, stored as JSON inside the `items` column.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub farmer_id: UserId,
    pub product_id: Uuid,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub quantity: i32,
}

/// Free-form order status. Any two distinct values count as a transition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OrderStatus(String);

impl OrderStatus {
    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque push address of one installed app instance.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(transparent)]
pub struct DeviceToken(String);

impl DeviceToken {
    /// Blank tokens are treated as "no token registered".
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub id: UserId,
    pub push_token: Option<DeviceToken>,
}

impl User {
    pub fn new(id: UserId, push_token: Option<String>) -> Self {
        Self {
            id,
            push_token: push_token.and_then(DeviceToken::parse),
        }
    }
}

impl Order {
    /// Distinct farmers referenced by the line items, in first-seen order.
    pub fn farmer_ids(&self) -> Vec<UserId> {
        let mut seen = std::collections::HashSet::new();
        self.items
            .iter()
            .map(|item| item.farmer_id)
            .filter(|id| seen.insert(*id))
            .collect()
    }
}
