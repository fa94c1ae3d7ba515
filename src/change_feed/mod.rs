// ============================================================================
// Change Feed - Orders CDC log to typed order changes
// ============================================================================
//
// ScyllaDB CDC writes one batch of log rows per base-table write:
//
//   [pre-image]  delta  [post-image]      (same cdc$time, last row end_of_batch)
//
// With `preimage: 'full'` and `postimage: true` on the orders table, a write
// that creates a row has only a post-image, and a write that modifies an
// existing row has both. The assembler turns each complete batch into at
// most one OrderChange; the consumer hands changes to the dispatcher.
//
// ============================================================================

mod row;
mod assembler;
mod errors;
mod consumer;

pub use assembler::OrderChange;
pub use consumer::OrderFeedConsumerFactory;
