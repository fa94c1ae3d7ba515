use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use std::time::{Duration, Instant};

// ============================================================================
// Circuit Breaker
// ============================================================================
//
// Guards calls to an external service. After enough consecutive failures the
// breaker opens and calls fail immediately; once the cool-down elapses a
// limited number of probe calls are let through.
//
// States:
// - Closed: Normal operation, requests pass through
// - Open: Too many failures, requests blocked immediately
// - HalfOpen: Probing, at most `half_open_max_calls` in flight
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures before opening the circuit
    pub failure_threshold: u32,
    /// Cool-down before probing again
    pub timeout: Duration,
    /// Successful probes needed to close from half-open
    pub success_threshold: u32,
    /// Concurrent probes allowed while half-open
    pub half_open_max_calls: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            timeout: Duration::from_secs(30),
            success_threshold: 2,
            half_open_max_calls: 1,
        }
    }
}

struct BreakerState {
    state: CircuitState,
    failure_count: u32,
    success_count: u32,
    opened_at: Option<Instant>,
}

/// Half-open probe slots. `epoch` changes on every state transition so a
/// permit from an earlier half-open window never frees a slot of a later one.
#[derive(Default)]
struct ProbeSlots {
    epoch: AtomicU64,
    in_flight: AtomicU32,
}

impl ProbeSlots {
    fn start_window(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.in_flight.store(0, Ordering::SeqCst);
    }
}

/// Holds a half-open probe slot until dropped, including when the call
/// future is cancelled mid-flight.
struct ProbePermit {
    slots: Arc<ProbeSlots>,
    epoch: u64,
}

impl Drop for ProbePermit {
    fn drop(&mut self) {
        if self.slots.epoch.load(Ordering::SeqCst) == self.epoch {
            let _ = self
                .slots
                .in_flight
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        }
    }
}

#[derive(Clone)]
pub struct CircuitBreaker {
    name: &'static str,
    state: Arc<Mutex<BreakerState>>,
    probes: Arc<ProbeSlots>,
    config: CircuitBreakerConfig,
}

impl CircuitBreaker {
    pub fn new(name: &'static str, config: CircuitBreakerConfig) -> Self {
        Self {
            name,
            state: Arc::new(Mutex::new(BreakerState {
                state: CircuitState::Closed,
                failure_count: 0,
                success_count: 0,
                opened_at: None,
            })),
            probes: Arc::new(ProbeSlots::default()),
            config,
        }
    }

    /// Execute an operation with circuit breaker protection
    pub async fn call<F, T, E>(&self, operation: F) -> Result<T, CircuitBreakerError<E>>
    where
        F: std::future::Future<Output = Result<T, E>>,
    {
        let Some(_permit) = self.try_acquire().await else {
            return Err(CircuitBreakerError::CircuitOpen);
        };

        match operation.await {
            Ok(result) => {
                self.record_success().await;
                Ok(result)
            }
            Err(err) => {
                self.record_failure().await;
                Err(CircuitBreakerError::OperationFailed(err))
            }
        }
    }

    /// Admit one more call if the breaker allows it right now. Half-open
    /// calls hold a probe slot for as long as the returned permit lives.
    async fn try_acquire(&self) -> Option<Option<ProbePermit>> {
        let mut state = self.state.lock().await;

        if state.state == CircuitState::Open {
            let cooled_down = state
                .opened_at
                .map_or(true, |opened| opened.elapsed() >= self.config.timeout);
            if !cooled_down {
                return None;
            }
            tracing::info!(breaker = self.name, "Circuit breaker transitioning to HalfOpen");
            state.state = CircuitState::HalfOpen;
            state.success_count = 0;
            self.probes.start_window();
        }

        if state.state != CircuitState::HalfOpen {
            return Some(None);
        }

        let max = self.config.half_open_max_calls;
        self.probes
            .in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| (n < max).then_some(n + 1))
            .ok()?;

        Some(Some(ProbePermit {
            slots: self.probes.clone(),
            epoch: self.probes.epoch.load(Ordering::SeqCst),
        }))
    }

    async fn record_success(&self) {
        let mut state = self.state.lock().await;

        match state.state {
            CircuitState::HalfOpen => {
                state.success_count += 1;
                if state.success_count >= self.config.success_threshold {
                    tracing::info!(
                        breaker = self.name,
                        successes = state.success_count,
                        "Circuit breaker closing"
                    );
                    state.state = CircuitState::Closed;
                    state.failure_count = 0;
                    state.success_count = 0;
                    state.opened_at = None;
                    self.probes.start_window();
                }
            }
            CircuitState::Closed => {
                state.failure_count = 0;
            }
            // A call admitted before another one tripped the breaker
            CircuitState::Open => {}
        }
    }

    async fn record_failure(&self) {
        let mut state = self.state.lock().await;

        match state.state {
            CircuitState::Closed => {
                state.failure_count += 1;
                if state.failure_count >= self.config.failure_threshold {
                    tracing::warn!(
                        breaker = self.name,
                        failures = state.failure_count,
                        "Circuit breaker opening"
                    );
                    state.state = CircuitState::Open;
                    state.opened_at = Some(Instant::now());
                }
            }
            CircuitState::HalfOpen => {
                tracing::warn!(breaker = self.name, "Probe failed, reopening circuit");
                state.state = CircuitState::Open;
                state.opened_at = Some(Instant::now());
                state.success_count = 0;
                self.probes.start_window();
            }
            CircuitState::Open => {}
        }
    }

    pub async fn get_state(&self) -> CircuitState {
        self.state.lock().await.state
    }

    /// Manually reset the circuit breaker
    #[cfg(test)]
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        tracing::info!(breaker = self.name, "Circuit breaker manually reset");
        state.state = CircuitState::Closed;
        state.failure_count = 0;
        state.success_count = 0;
        state.opened_at = None;
        self.probes.start_window();
    }
}

#[derive(Debug)]
pub enum CircuitBreakerError<E> {
    CircuitOpen,
    OperationFailed(E),
}

impl<E: std::fmt::Display> std::fmt::Display for CircuitBreakerError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CircuitBreakerError::CircuitOpen => write!(f, "Circuit breaker is open"),
            CircuitBreakerError::OperationFailed(e) => write!(f, "Operation failed: {}", e),
        }
    }
}

impl<E: std::error::Error> std::error::Error for CircuitBreakerError<E> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn breaker(failure_threshold: u32, timeout: Duration, success_threshold: u32) -> CircuitBreaker {
        CircuitBreaker::new(
            "test",
            CircuitBreakerConfig {
                failure_threshold,
                timeout,
                success_threshold,
                half_open_max_calls: 1,
            },
        )
    }

    #[tokio::test]
    async fn test_circuit_breaker_opens_after_failures() {
        let cb = breaker(3, Duration::from_secs(1), 2);

        for _ in 0..3 {
            let result = cb.call(async { Err::<(), _>("error") }).await;
            assert!(result.is_err());
        }

        assert_eq!(cb.get_state().await, CircuitState::Open);

        // Next call should fail without running the operation
        let result = cb.call(async { Ok::<_, &str>(()) }).await;
        assert!(matches!(result, Err(CircuitBreakerError::CircuitOpen)));
    }

    #[tokio::test]
    async fn test_success_resets_failure_streak() {
        let cb = breaker(2, Duration::from_secs(1), 1);

        let _ = cb.call(async { Err::<(), _>("error") }).await;
        let _ = cb.call(async { Ok::<_, &str>(()) }).await;
        let _ = cb.call(async { Err::<(), _>("error") }).await;

        assert_eq!(cb.get_state().await, CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_circuit_breaker_half_open_after_timeout() {
        let cb = breaker(2, Duration::from_millis(100), 1);

        for _ in 0..2 {
            let _ = cb.call(async { Err::<(), _>("error") }).await;
        }
        assert_eq!(cb.get_state().await, CircuitState::Open);

        tokio::time::sleep(Duration::from_millis(150)).await;

        let result = cb.call(async { Ok::<_, &str>(()) }).await;
        assert!(result.is_ok());
        assert_eq!(cb.get_state().await, CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_failed_probe_reopens() {
        let cb = breaker(1, Duration::from_millis(50), 1);

        let _ = cb.call(async { Err::<(), _>("error") }).await;
        tokio::time::sleep(Duration::from_millis(80)).await;

        let result = cb.call(async { Err::<(), _>("still down") }).await;
        assert!(matches!(result, Err(CircuitBreakerError::OperationFailed("still down"))));
        assert_eq!(cb.get_state().await, CircuitState::Open);
    }

    #[tokio::test]
    async fn test_cancelled_probe_frees_its_slot() {
        let cb = breaker(1, Duration::from_millis(50), 1);

        let _ = cb.call(async { Err::<(), _>("error") }).await;
        tokio::time::sleep(Duration::from_millis(80)).await;

        // The only probe slot is taken by a call that never finishes and is dropped
        let stalled = tokio::time::timeout(
            Duration::from_millis(20),
            cb.call(std::future::pending::<Result<(), &str>>()),
        )
        .await;
        assert!(stalled.is_err());
        assert_eq!(cb.get_state().await, CircuitState::HalfOpen);

        let result = cb.call(async { Ok::<_, &str>(()) }).await;
        assert!(result.is_ok());
        assert_eq!(cb.get_state().await, CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_half_open_limits_concurrent_probes() {
        let cb = breaker(1, Duration::from_millis(50), 1);

        let _ = cb.call(async { Err::<(), _>("error") }).await;
        tokio::time::sleep(Duration::from_millis(80)).await;

        let (release, wait) = tokio::sync::oneshot::channel::<()>();
        let probing = cb.clone();
        let probe = tokio::spawn(async move {
            probing
                .call(async move {
                    let _ = wait.await;
                    Ok::<_, &str>(())
                })
                .await
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        let refused = cb.call(async { Ok::<_, &str>(()) }).await;
        assert!(matches!(refused, Err(CircuitBreakerError::CircuitOpen)));

        let _ = release.send(());
        assert!(probe.await.unwrap().is_ok());
        assert_eq!(cb.get_state().await, CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_reset_closes_circuit() {
        let cb = breaker(1, Duration::from_secs(60), 1);

        let _ = cb.call(async { Err::<(), _>("error") }).await;
        assert_eq!(cb.get_state().await, CircuitState::Open);

        cb.reset().await;
        assert_eq!(cb.get_state().await, CircuitState::Closed);
        assert!(cb.call(async { Ok::<_, &str>(1) }).await.is_ok());
    }
}
