use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::FcmSettings;
use crate::notifiers::{NotificationPayload, PushSender};
use crate::utils::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerError};

/// Firebase Cloud Messaging HTTP v1 client
pub struct FcmClient {
    http: reqwest::Client,
    send_url: String,
    access_token: String,
    circuit_breaker: CircuitBreaker,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    message: &'a NotificationPayload,
}

/// How FCM answered a request that reached it
enum Delivery {
    Accepted(String),
    /// The message was refused for its own reasons (stale or malformed
    /// token, payload too large). FCM itself is up.
    Rejected(anyhow::Error),
}

#[derive(Deserialize)]
struct SendResponse {
    /// `projects/{project}/messages/{id}`
    name: String,
}

impl FcmClient {
    pub fn new(settings: &FcmSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;

        // Configure circuit breaker for FCM
        let cb_config = CircuitBreakerConfig {
            failure_threshold: 5,           // Open after 5 failures
            timeout: std::time::Duration::from_secs(30),  // Wait 30s before probing
            success_threshold: 2,           // Need 2 successes to close
            half_open_max_calls: 1,
        };

        Ok(Self {
            http,
            send_url: send_url(&settings.endpoint, &settings.project_id),
            access_token: settings.access_token.clone(),
            circuit_breaker: CircuitBreaker::new("fcm", cb_config),
        })
    }

    /// Shared handle for health polling
    pub fn circuit_breaker(&self) -> CircuitBreaker {
        self.circuit_breaker.clone()
    }

    #[cfg(test)]
    pub async fn get_circuit_breaker_state(&self) -> crate::utils::CircuitState {
        self.circuit_breaker.get_state().await
    }

    /// `Err` only for failures that say something about FCM's availability:
    /// transport errors, auth failures, throttling and 5xx.
    async fn post(&self, payload: &NotificationPayload) -> Result<Delivery> {
        let response = self
            .http
            .post(&self.send_url)
            .bearer_auth(&self.access_token)
            .json(&SendRequest { message: payload })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let sent: SendResponse = response.json().await?;
            return Ok(Delivery::Accepted(sent.name));
        }

        let body = response.text().await.unwrap_or_default();
        if is_recipient_rejection(status) {
            return Ok(Delivery::Rejected(anyhow::anyhow!(
                "FCM rejected message ({}): {}",
                status,
                body
            )));
        }
        anyhow::bail!("FCM unavailable ({}): {}", status, body)
    }
}

/// 4xx answers scoped to one message. 401 means our credentials are bad and
/// 429 means we are throttled, both of which hit every recipient.
fn is_recipient_rejection(status: reqwest::StatusCode) -> bool {
    status.is_client_error()
        && status != reqwest::StatusCode::UNAUTHORIZED
        && status != reqwest::StatusCode::TOO_MANY_REQUESTS
}

fn send_url(endpoint: &str, project_id: &str) -> String {
    format!(
        "{}/v1/projects/{}/messages:send",
        endpoint.trim_end_matches('/'),
        project_id
    )
}

#[async_trait]
impl PushSender for FcmClient {
    async fn send(&self, payload: &NotificationPayload) -> Result<String> {
        // Use circuit breaker to protect against FCM outages
        match self.circuit_breaker.call(self.post(payload)).await {
            Ok(Delivery::Accepted(message_id)) => {
                tracing::debug!(
                    message_id = %message_id,
                    kind = %payload.data.kind,
                    "Delivered to FCM"
                );
                Ok(message_id)
            }
            Ok(Delivery::Rejected(e)) => {
                tracing::warn!(
                    kind = %payload.data.kind,
                    error = %e,
                    "FCM rejected message for this device"
                );
                Err(e)
            }
            Err(CircuitBreakerError::CircuitOpen) => {
                tracing::error!(
                    kind = %payload.data.kind,
                    "Circuit breaker open - FCM unavailable"
                );
                Err(anyhow::anyhow!("Circuit breaker open for FCM"))
            }
            Err(CircuitBreakerError::OperationFailed(e)) => Err(e),
        }
    }
}
