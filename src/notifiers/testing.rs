//! In-memory collaborators for notifier and dispatcher tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::models::{User, UserId};
use super::payload::NotificationPayload;
use super::ports::{PushSender, UserDirectory};

#[derive(Default)]
pub struct InMemoryUsers {
    users: HashMap<UserId, User>,
    unreachable: HashSet<UserId>,
    lookups: Mutex<Vec<UserId>>,
}

impl InMemoryUsers {
    pub fn with_token(mut self, id: UserId, token: &str) -> Self {
        self.users.insert(id, User::new(id, Some(token.to_string())));
        self
    }

    pub fn without_token(mut self, id: UserId) -> Self {
        self.users.insert(id, User::new(id, None));
        self
    }

    /// Lookups for this id fail as if the store were down
    pub fn unreachable(mut self, id: UserId) -> Self {
        self.unreachable.insert(id);
        self
    }

    pub fn lookups(&self) -> Vec<UserId> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUsers {
    async fn get_user(&self, id: UserId) -> anyhow::Result<Option<User>> {
        self.lookups.lock().unwrap().push(id);
        if self.unreachable.contains(&id) {
            anyhow::bail!("store unreachable");
        }
        Ok(self.users.get(&id).cloned())
    }
}

#[derive(Default)]
pub struct RecordingPush {
    rejected_tokens: HashSet<String>,
    attempts: Mutex<Vec<NotificationPayload>>,
}

impl RecordingPush {
    pub fn rejecting(mut self, token: &str) -> Self {
        self.rejected_tokens.insert(token.to_string());
        self
    }

    /// Every payload handed to `send`, accepted or not
    pub fn attempts(&self) -> Vec<NotificationPayload> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn tokens(&self) -> Vec<String> {
        self.attempts()
            .into_iter()
            .map(|p| p.token.as_str().to_string())
            .collect()
    }
}

#[async_trait]
impl PushSender for RecordingPush {
    async fn send(&self, payload: &NotificationPayload) -> anyhow::Result<String> {
        let count = {
            let mut attempts = self.attempts.lock().unwrap();
            attempts.push(payload.clone());
            attempts.len()
        };
        if self.rejected_tokens.contains(payload.token.as_str()) {
            anyhow::bail!("registration token is not valid");
        }
        Ok(format!("projects/test/messages/{}", count))
    }
}
