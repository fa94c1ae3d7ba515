use anyhow::Result;
use async_trait::async_trait;
use scylla::client::session::Session;
use scylla::statement::prepared::PreparedStatement;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{User, UserId};
use crate::notifiers::UserDirectory;

/// `UserDirectory` backed by the ScyllaDB users table
pub struct ScyllaUserDirectory {
    session: Arc<Session>,
    select_user: PreparedStatement,
}

impl ScyllaUserDirectory {
    pub async fn new(session: Arc<Session>, keyspace: &str, table: &str) -> Result<Self> {
        let select_user = session
            .prepare(select_user_cql(keyspace, table))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to prepare user lookup: {}", e))?;

        Ok(Self { session, select_user })
    }
}

fn select_user_cql(keyspace: &str, table: &str) -> String {
    format!("SELECT id, push_token FROM {}.{} WHERE id = ?", keyspace, table)
}

#[async_trait]
impl UserDirectory for ScyllaUserDirectory {
    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        let result = self
            .session
            .execute_unpaged(&self.select_user, (id,))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to query user {}: {}", id, e))?;

        let rows_result = result
            .into_rows_result()
            .map_err(|e| anyhow::anyhow!("Failed to parse user rows: {}", e))?;

        let row = rows_result
            .maybe_first_row::<(Uuid, Option<String>)>()
            .map_err(|e| anyhow::anyhow!("Failed to read user row: {}", e))?;

        Ok(row.map(|(id, push_token)| User::new(id, push_token)))
    }
}
