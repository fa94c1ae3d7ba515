use crate::models::{OrderId, UserId};
use super::errors::DispatchError;
use super::payload::NotificationKind;

/// What happened to one recipient
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Sent { message_id: String },
    SkippedNoToken,
    SkippedUnknownUser,
    Failed(DispatchError),
}

impl DispatchOutcome {
    /// Metric label
    pub fn label(&self) -> &'static str {
        match self {
            DispatchOutcome::Sent { .. } => "sent",
            DispatchOutcome::SkippedNoToken => "skipped_no_token",
            DispatchOutcome::SkippedUnknownUser => "skipped_unknown_user",
            DispatchOutcome::Failed(DispatchError::Lookup { .. }) => "lookup_failed",
            DispatchOutcome::Failed(DispatchError::Delivery { .. }) => "delivery_failed",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, DispatchOutcome::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecipientOutcome {
    pub recipient: UserId,
    pub outcome: DispatchOutcome,
}

/// Per-recipient results of handling one order event
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchReport {
    pub order_id: OrderId,
    pub kind: NotificationKind,
    pub outcomes: Vec<RecipientOutcome>,
}

impl DispatchReport {
    pub fn empty(order_id: OrderId, kind: NotificationKind) -> Self {
        Self { order_id, kind, outcomes: Vec::new() }
    }

    pub fn sent(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.outcome, DispatchOutcome::Sent { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.outcome.is_failure()).count()
    }

    pub fn outcome_for(&self, recipient: UserId) -> Option<&DispatchOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.recipient == recipient)
            .map(|o| &o.outcome)
    }
}
