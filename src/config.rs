use std::collections::HashMap;
use std::time::Duration;

// ============================================================================
// Settings - Environment-driven configuration
// ============================================================================
//
// Values come from the process environment; a `.env` file in the working
// directory is loaded first when present.
//
// ============================================================================

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing required setting {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ScyllaSettings {
    pub nodes: Vec<String>,
    pub keyspace: String,
    pub orders_table: String,
    pub users_table: String,
    pub bootstrap_schema: bool,
}

#[derive(Debug, Clone)]
pub struct FcmSettings {
    pub project_id: String,
    pub access_token: String,
    pub endpoint: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub scylla: ScyllaSettings,
    pub fcm: FcmSettings,
    pub metrics_port: u16,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_vars(&std::env::vars().collect())
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());
        let or = |key: &str, default: &str| get(key).unwrap_or(default).to_string();
        let required = |key: &'static str| get(key).map(str::to_string).ok_or(ConfigError::Missing(key));

        let nodes: Vec<String> = or("SCYLLA_NODES", "127.0.0.1:9042")
            .split(',')
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        if nodes.is_empty() {
            return Err(ConfigError::Missing("SCYLLA_NODES"));
        }

        let scylla = ScyllaSettings {
            nodes,
            keyspace: identifier("SCYLLA_KEYSPACE", or("SCYLLA_KEYSPACE", "orders_ks"))?,
            orders_table: identifier("ORDERS_TABLE", or("ORDERS_TABLE", "orders"))?,
            users_table: identifier("USERS_TABLE", or("USERS_TABLE", "users"))?,
            bootstrap_schema: parse_bool("BOOTSTRAP_SCHEMA", &or("BOOTSTRAP_SCHEMA", "true"))?,
        };

        let timeout_secs: u64 = parse("FCM_TIMEOUT_SECS", &or("FCM_TIMEOUT_SECS", "10"))?;
        let fcm = FcmSettings {
            project_id: required("FCM_PROJECT_ID")?,
            access_token: required("FCM_ACCESS_TOKEN")?,
            endpoint: or("FCM_ENDPOINT", "https://fcm.googleapis.com")
                .trim_end_matches('/')
                .to_string(),
            timeout: Duration::from_secs(timeout_secs),
        };

        Ok(Self {
            scylla,
            fcm,
            metrics_port: parse("METRICS_PORT", &or("METRICS_PORT", "9090"))?,
        })
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid { key, value: value.to_string() })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { key, value: value.to_string() }),
    }
}

/// Keyspace and table names are spliced into CQL, so only plain identifiers
fn identifier(key: &'static str, value: String) -> Result<String, ConfigError> {
    let valid = value
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(value)
    } else {
        Err(ConfigError::Invalid { key, value })
    }
}
