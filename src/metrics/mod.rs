// Private module declaration
mod server;

use prometheus::{
    HistogramOpts, HistogramVec, IntCounter, IntCounterVec,
    IntGauge, Opts, Registry,
};

use crate::utils::CircuitState;

// Re-export for public API
pub use server::start_metrics_server;

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - Order changes read from the CDC log
// - Notification outcomes per recipient
// - Change rows that could not be decoded
// - Push circuit breaker state
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

/// Central metrics registry for the entire application
pub struct Metrics {
    registry: Registry,

    // Change Feed Metrics
    pub order_changes: IntCounterVec,
    pub change_decode_failures: IntCounter,

    // Notification Metrics
    pub notifications: IntCounterVec,
    pub dispatch_duration: HistogramVec,

    // Circuit Breaker Metrics
    pub push_circuit_state: IntGauge,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let order_changes = IntCounterVec::new(
            Opts::new("order_changes_total", "Total order changes read from the CDC log"),
            &["kind"],
        )?;
        registry.register(Box::new(order_changes.clone()))?;

        let change_decode_failures = IntCounter::new(
            "change_decode_failures_total",
            "CDC batches dropped because the order could not be decoded",
        )?;
        registry.register(Box::new(change_decode_failures.clone()))?;

        let notifications = IntCounterVec::new(
            Opts::new("notifications_total", "Notification outcomes per recipient"),
            &["kind", "outcome"],
        )?;
        registry.register(Box::new(notifications.clone()))?;

        let dispatch_duration = HistogramVec::new(
            HistogramOpts::new("dispatch_duration_seconds", "Time to notify all recipients of one change")
                .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0]),
            &["kind"],
        )?;
        registry.register(Box::new(dispatch_duration.clone()))?;

        let push_circuit_state = IntGauge::new(
            "push_circuit_state",
            "Push circuit breaker state (0=Closed, 1=Open, 2=HalfOpen)",
        )?;
        registry.register(Box::new(push_circuit_state.clone()))?;

        Ok(Self {
            registry,
            order_changes,
            change_decode_failures,
            notifications,
            dispatch_duration,
            push_circuit_state,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_order_change(&self, kind: &str) {
        self.order_changes.with_label_values(&[kind]).inc();
    }

    pub fn record_decode_failure(&self) {
        self.change_decode_failures.inc();
    }

    pub fn record_notification(&self, kind: &str, outcome: &str) {
        self.notifications.with_label_values(&[kind, outcome]).inc();
    }

    pub fn observe_dispatch(&self, kind: &str, duration_secs: f64) {
        self.dispatch_duration.with_label_values(&[kind]).observe(duration_secs);
    }

    pub fn update_push_circuit_state(&self, state: CircuitState) {
        let value = match state {
            CircuitState::Closed => 0,
            CircuitState::Open => 1,
            CircuitState::HalfOpen => 2,
        };
        self.push_circuit_state.set(value);
    }
}
