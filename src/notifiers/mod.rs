// ============================================================================
// Notifiers - Order events to push notifications
// ============================================================================
//
// Two stateless handlers:
// - OrderCreatedNotifier:       new order -> one push per distinct farmer
// - OrderStatusChangedNotifier: status change -> one push to the consumer
//
// Each handler first plans its DispatchRequests from the event alone, then
// resolves device tokens and delivers. Recipients are independent: a failure
// for one never suppresses the others.
//
// ============================================================================

pub mod payload;
pub mod ports;
pub mod outcome;
pub mod errors;
mod delivery;
mod order_created;
mod status_changed;

#[cfg(test)]
pub(crate) mod testing;

pub use payload::*;
pub use ports::*;
pub use outcome::*;
pub use errors::*;
pub use order_created::OrderCreatedNotifier;
pub use status_changed::OrderStatusChangedNotifier;
