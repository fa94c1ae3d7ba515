use crate::models::UserId;

// ============================================================================
// Per-recipient Dispatch Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    #[error("User lookup failed for {user_id}: {reason}")]
    Lookup { user_id: UserId, reason: String },

    #[error("Push delivery failed for {user_id}: {reason}")]
    Delivery { user_id: UserId, reason: String },
}

impl DispatchError {
    pub fn lookup(user_id: UserId, err: impl std::fmt::Display) -> Self {
        DispatchError::Lookup { user_id, reason: err.to_string() }
    }

    pub fn delivery(user_id: UserId, err: impl std::fmt::Display) -> Self {
        DispatchError::Delivery { user_id, reason: err.to_string() }
    }
}
