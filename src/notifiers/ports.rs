use async_trait::async_trait;

use crate::models::{User, UserId};
use super::payload::NotificationPayload;

/// Read access to user records
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// `Ok(None)` when no user exists with this id
    async fn get_user(&self, id: UserId) -> anyhow::Result<Option<User>>;
}

/// Best-effort push delivery
#[async_trait]
pub trait PushSender: Send + Sync {
    /// Returns the provider's message id on acceptance
    async fn send(&self, payload: &NotificationPayload) -> anyhow::Result<String>;
}
