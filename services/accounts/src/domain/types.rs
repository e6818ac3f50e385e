use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use readnest_domain::role::RoleSet;

/// Maximum consecutive failed login attempts before an account locks.
pub const MAX_LOGIN_ATTEMPTS: u32 = 5;

/// How long an attempt-counter entry lives after its last write.
pub const ATTEMPT_TTL: Duration = Duration::from_secs(15 * 60);

/// Length of generated activation and reset codes.
pub const CODE_LEN: usize = 6;

/// Activation code lifetime in seconds.
pub const ACTIVATION_CODE_TTL_SECS: i64 = 15 * 60;

/// Reset code lifetime in seconds.
pub const RESET_CODE_TTL_SECS: i64 = 60 * 60;

/// How long a durable lock holds, measured from the locking failure.
pub const LOCKOUT_SECS: i64 = 15 * 60;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Account record. `roles` persists as a bitmask column; the reset fields
/// hold at most one outstanding code per user.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Normalized (trimmed, lowercased) — the unique lookup key.
    pub email: String,
    pub password_hash: String,
    /// Set once the activation code is consumed.
    pub enabled: bool,
    pub account_locked: bool,
    pub locked_at: Option<DateTime<Utc>>,
    pub unlock_at: Option<DateTime<Utc>>,
    pub reset_code: Option<String>,
    pub reset_code_expires_at: Option<DateTime<Utc>>,
    pub roles: RoleSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether the durable lock still holds at `now`. A locked record with no
    /// unlock time stays locked until a password reset clears it.
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.account_locked && self.unlock_at.is_none_or(|t| t > now)
    }
}

/// One-time code proving ownership of a registered email address. Multiple
/// unconsumed codes may coexist for a user after reissues.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationCode {
    pub id: Uuid,
    pub user_id: Uuid,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    /// Consumption marker; `Some` means the code can never validate again.
    pub validated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ActivationCode {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Normalize an email for lookups and uniqueness: trim and lowercase.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Shape check for already-normalized emails: one `@`, a non-empty local
/// part, a dotted domain, no whitespace.
pub fn valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
