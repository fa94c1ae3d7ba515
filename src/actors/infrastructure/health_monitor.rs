use kameo::Actor;
use kameo::Reply;
use kameo::message::{Context, Message};
use kameo::actor::ActorRef;
use kameo::error::Infallible;
use std::sync::Arc;
use std::collections::HashMap;
use std::time::Duration;
use chrono::Utc;
use crate::metrics::Metrics;
use crate::utils::{CircuitBreaker, CircuitState};
use crate::actors::core::{HealthStatus, ComponentHealth};

// ============================================================================
// Health Monitor Actor - Monitors system health
// ============================================================================
//
// Responsibilities:
// - Track health status of all components
// - Poll the push circuit breaker
// - Aggregate system-wide health for the /health endpoint
//
// ============================================================================

const PUSH_COMPONENT: &str = "push";
const POLL_INTERVAL: Duration = Duration::from_secs(10);

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug)]
pub struct UpdateHealth {
    pub component: String,
    pub status: HealthStatus,
    pub details: Option<String>,
}

#[derive(Debug)]
pub struct GetSystemHealth;

#[derive(Debug, Clone, Reply)]
pub struct SystemHealth {
    pub overall_status: HealthStatus,
    pub components: HashMap<String, ComponentHealth>,
    pub check_time: chrono::DateTime<Utc>,
}

// ============================================================================
// Health Monitor Actor
// ============================================================================

pub struct HealthMonitorActor {
    components: HashMap<String, ComponentHealth>,
    push_breaker: Option<CircuitBreaker>,
    metrics: Option<Arc<Metrics>>,
}

impl HealthMonitorActor {
    pub fn new(push_breaker: CircuitBreaker, metrics: Arc<Metrics>) -> Self {
        Self {
            components: HashMap::new(),
            push_breaker: Some(push_breaker),
            metrics: Some(metrics),
        }
    }

    /// A monitor that only aggregates what it is told
    #[cfg(test)]
    pub fn passive() -> Self {
        Self {
            components: HashMap::new(),
            push_breaker: None,
            metrics: None,
        }
    }

    fn compute_overall_status(&self) -> HealthStatus {
        let mut has_degraded = false;
        let mut unhealthy_components = Vec::new();

        for (name, health) in &self.components {
            match &health.status {
                HealthStatus::Unhealthy(msg) => {
                    unhealthy_components.push(format!("{}: {}", name, msg));
                }
                HealthStatus::Degraded(_) => {
                    has_degraded = true;
                }
                HealthStatus::Healthy => {}
            }
        }

        if !unhealthy_components.is_empty() {
            unhealthy_components.sort();
            HealthStatus::Unhealthy(unhealthy_components.join(", "))
        } else if has_degraded {
            HealthStatus::Degraded("Some components degraded".to_string())
        } else {
            HealthStatus::Healthy
        }
    }
}

fn circuit_health(state: CircuitState) -> HealthStatus {
    match state {
        CircuitState::Closed => HealthStatus::Healthy,
        CircuitState::HalfOpen => HealthStatus::Degraded("Circuit breaker half-open".to_string()),
        CircuitState::Open => HealthStatus::Unhealthy("Circuit breaker open".to_string()),
    }
}

impl Actor for HealthMonitorActor {
    type Args = Self;
    type Error = Infallible;

    async fn on_start(
        state: Self::Args,
        actor_ref: ActorRef<Self>
    ) -> Result<Self, Self::Error> {
        tracing::info!("HealthMonitorActor started");

        if let Some(breaker) = state.push_breaker.clone() {
            let metrics = state.metrics.clone();
            let actor_ref = actor_ref.clone();

            tokio::spawn(async move {
                let mut interval = tokio::time::interval(POLL_INTERVAL);
                loop {
                    interval.tick().await;

                    let circuit = breaker.get_state().await;
                    if let Some(ref metrics) = metrics {
                        metrics.update_push_circuit_state(circuit);
                    }

                    let update = UpdateHealth {
                        component: PUSH_COMPONENT.to_string(),
                        status: circuit_health(circuit),
                        details: None,
                    };
                    if actor_ref.tell(update).await.is_err() {
                        tracing::debug!("Health monitor gone, stopping push polling");
                        break;
                    }
                }
            });
        }

        Ok(state)
    }
}

// ============================================================================
// Message Handlers
// ============================================================================

impl Message<UpdateHealth> for HealthMonitorActor {
    type Reply = ();

    async fn handle(&mut self, msg: UpdateHealth, _ctx: &mut Context<Self, Self::Reply>) -> Self::Reply {
        let health = ComponentHealth::new(msg.component.clone(), msg.status.clone())
            .with_details(msg.details);

        if let Some(previous) = self.components.get(&msg.component) {
            if previous.status != msg.status {
                if msg.status.is_healthy() {
                    tracing::info!(
                        component = %msg.component,
                        from = ?previous.status,
                        "Component recovered"
                    );
                } else {
                    tracing::warn!(
                        component = %msg.component,
                        from = ?previous.status,
                        to = ?msg.status,
                        "Component health changed"
                    );
                }
            }
        }

        self.components.insert(msg.component, health);
    }
}

impl Message<GetSystemHealth> for HealthMonitorActor {
    type Reply = SystemHealth;

    async fn handle(&mut self, _msg: GetSystemHealth, _ctx: &mut Context<Self, Self::Reply>) -> Self::Reply {
        SystemHealth {
            overall_status: self.compute_overall_status(),
            components: self.components.clone(),
            check_time: Utc::now(),
        }
    }
}
