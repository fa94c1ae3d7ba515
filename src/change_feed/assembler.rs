use uuid::Uuid;

use crate::models::Order;
use super::errors::ChangeDecodeError;
use super::row::{ChangeRow, OrderColumns, RowKind};

/// A complete write to the orders table, seen through its images
#[derive(Debug, Clone, PartialEq)]
pub enum OrderChange {
    Created(Order),
    Updated { before: Order, after: Order },
}

impl OrderChange {
    pub fn kind(&self) -> &'static str {
        match self {
            OrderChange::Created(_) => "created",
            OrderChange::Updated { .. } => "updated",
        }
    }

    pub fn order_id(&self) -> Uuid {
        match self {
            OrderChange::Created(order) => order.id,
            OrderChange::Updated { after, .. } => after.id,
        }
    }
}

#[derive(Debug, Default)]
struct PendingWrite {
    before: Option<OrderColumns>,
    after: Option<OrderColumns>,
    deleted: bool,
}

impl PendingWrite {
    fn finish(self) -> Result<Option<OrderChange>, ChangeDecodeError> {
        if self.deleted {
            return Ok(None);
        }

        match (self.before, self.after) {
            (None, Some(after)) => Ok(Some(OrderChange::Created(after.try_into()?))),
            (Some(before), Some(after)) => Ok(Some(OrderChange::Updated {
                before: before.try_into()?,
                after: after.try_into()?,
            })),
            _ => Ok(None),
        }
    }
}

/// Groups the rows of one stream into per-write changes.
///
/// Rows of a single write arrive contiguously with increasing `batch_seq_no`,
/// so one pending write is enough.
#[derive(Debug, Default)]
pub struct ChangeAssembler {
    pending: Option<PendingWrite>,
}

impl ChangeAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one log row. Yields a change when the row closes its batch.
    pub fn push(&mut self, row: ChangeRow) -> Result<Option<OrderChange>, ChangeDecodeError> {
        let mut pending = match self.pending.take() {
            Some(stale) if row.batch_seq_no == 0 => {
                tracing::warn!(
                    had_pre_image = stale.before.is_some(),
                    "Dropping incomplete CDC batch"
                );
                PendingWrite::default()
            }
            Some(p) => p,
            None => PendingWrite::default(),
        };

        match row.kind {
            RowKind::PreImage => pending.before = Some(row.columns),
            RowKind::PostImage => pending.after = Some(row.columns),
            RowKind::Delete => pending.deleted = true,
            RowKind::Insert | RowKind::Update => {}
        }

        if row.end_of_batch {
            pending.finish()
        } else {
            self.pending = Some(pending);
            Ok(None)
        }
    }
}
