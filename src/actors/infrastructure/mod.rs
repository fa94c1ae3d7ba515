// ============================================================================
// Infrastructure Actors
// ============================================================================
//
// - Change feed processing (orders CDC log -> notifications)
// - Health monitoring
//
// ============================================================================

mod change_feed_processor;
mod health_monitor;

pub use change_feed_processor::ChangeFeedProcessor;
pub use health_monitor::{HealthMonitorActor, UpdateHealth, GetSystemHealth};
