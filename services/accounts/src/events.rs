use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Notable account transitions, emitted as they happen so operators (and
/// tests) can observe side effects that are invisible in the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountEvent {
    /// An expired activation code was presented; a fresh one was issued
    /// before the failure was surfaced.
    ActivationExpiredReissued { user_id: Uuid },
    /// The failure count crossed the cap and a durable lock was stamped on
    /// the user record.
    AccountLocked { user_id: Uuid, unlock_at: DateTime<Utc> },
}

/// Sink for account events.
pub trait AccountEvents: Send + Sync {
    fn emit(&self, event: AccountEvent);
}

/// Production sink: structured log lines.
pub struct TracingEvents;

impl AccountEvents for TracingEvents {
    fn emit(&self, event: AccountEvent) {
        match event {
            AccountEvent::ActivationExpiredReissued { user_id } => {
                tracing::info!(%user_id, "activation code expired, issued a fresh one");
            }
            AccountEvent::AccountLocked { user_id, unlock_at } => {
                tracing::warn!(%user_id, %unlock_at, "account locked after repeated login failures");
            }
        }
    }
}
