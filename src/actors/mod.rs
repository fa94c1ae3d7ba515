// ============================================================================
// Actors Module
// ============================================================================
//
// Actor-based infrastructure for long-running concerns.
//
// Structure:
// - core/           - Health types shared by actors
// - infrastructure/ - Change feed processor and health monitor
//
// Note: Notification logic lives in `notifiers` and is plain async code.
//       Actors are reserved for infrastructure concerns only.
//
// ============================================================================

mod core;
mod infrastructure;

pub use self::core::HealthStatus;
pub use self::infrastructure::{ChangeFeedProcessor, GetSystemHealth, HealthMonitorActor};
