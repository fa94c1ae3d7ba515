use super::errors::DispatchError;
use super::outcome::{DispatchOutcome, RecipientOutcome};
use super::payload::DispatchRequest;
use super::ports::{PushSender, UserDirectory};

/// Resolve the recipient's token and hand the payload to the push sender.
///
/// Never returns an error: every failure is folded into the outcome so the
/// caller can keep going with other recipients.
pub(super) async fn deliver(
    users: &dyn UserDirectory,
    push: &dyn PushSender,
    request: DispatchRequest,
) -> RecipientOutcome {
    let recipient = request.recipient;
    let outcome = resolve_and_send(users, push, request).await;
    RecipientOutcome { recipient, outcome }
}

async fn resolve_and_send(
    users: &dyn UserDirectory,
    push: &dyn PushSender,
    request: DispatchRequest,
) -> DispatchOutcome {
    let recipient = request.recipient;

    let user = match users.get_user(recipient).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::debug!(user_id = %recipient, "No user record, skipping notification");
            return DispatchOutcome::SkippedUnknownUser;
        }
        Err(e) => {
            tracing::warn!(user_id = %recipient, error = %e, "User lookup failed");
            return DispatchOutcome::Failed(DispatchError::lookup(recipient, e));
        }
    };

    let Some(token) = user.push_token else {
        tracing::debug!(user_id = %recipient, "User has no device token, skipping notification");
        return DispatchOutcome::SkippedNoToken;
    };

    let kind = request.kind;
    let order_id = request.order_id;
    let payload = request.into_payload(token);

    match push.send(&payload).await {
        Ok(message_id) => {
            tracing::info!(
                user_id = %recipient,
                order_id = %order_id,
                kind = %kind,
                message_id = %message_id,
                "📲 Push notification sent"
            );
            DispatchOutcome::Sent { message_id }
        }
        Err(e) => {
            tracing::warn!(
                user_id = %recipient,
                order_id = %order_id,
                kind = %kind,
                error = %e,
                "Push delivery failed"
            );
            DispatchOutcome::Failed(DispatchError::delivery(recipient, e))
        }
    }
}
