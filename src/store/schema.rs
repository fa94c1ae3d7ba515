use anyhow::Result;
use scylla::client::session::Session;

use crate::config::ScyllaSettings;

// ============================================================================
// Schema Bootstrap
// ============================================================================
//
// orders: written by the ordering flow. CDC keeps a full pre-image and a
//         post-image so both snapshots of an update reach the change feed.
// users:  written by the registration flow, read here for device tokens.
//
// ============================================================================

pub(crate) fn schema_statements(settings: &ScyllaSettings) -> Vec<String> {
    let ks = &settings.keyspace;
    vec![
        format!(
            "CREATE KEYSPACE IF NOT EXISTS {} WITH REPLICATION = \
             {{'class': 'SimpleStrategy', 'replication_factor': 1}}",
            ks
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {}.{} (\
                id uuid PRIMARY KEY, \
                consumer_id uuid, \
                items text, \
                status text\
             ) WITH cdc = {{'enabled': true, 'preimage': 'full', 'postimage': true}}",
            ks, settings.orders_table
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {}.{} (\
                id uuid PRIMARY KEY, \
                push_token text\
             )",
            ks, settings.users_table
        ),
    ]
}

/// Create the keyspace and tables if they do not exist yet
pub async fn ensure_schema(session: &Session, settings: &ScyllaSettings) -> Result<()> {
    for statement in schema_statements(settings) {
        session
            .query_unpaged(statement, &[])
            .await
            .map_err(|e| anyhow::anyhow!("Schema bootstrap failed: {}", e))?;
    }

    tracing::info!(
        keyspace = %settings.keyspace,
        orders = %settings.orders_table,
        users = %settings.users_table,
        "Schema ready"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_table_has_cdc_images() {
        let settings = ScyllaSettings {
            nodes: vec!["127.0.0.1:9042".to_string()],
            keyspace: "shop".to_string(),
            orders_table: "orders".to_string(),
            users_table: "users".to_string(),
            bootstrap_schema: true,
        };

        let statements = schema_statements(&settings);
        assert_eq!(statements.len(), 3);
        assert!(statements[0].starts_with("CREATE KEYSPACE IF NOT EXISTS shop"));
        assert!(statements[1].contains("shop.orders"));
        assert!(statements[1].contains("'preimage': 'full'"));
        assert!(statements[1].contains("'postimage': true"));
        assert!(statements[2].contains("shop.users"));
        assert!(statements[2].contains("push_token text"));
    }
}
