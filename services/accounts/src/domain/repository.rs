#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use readnest_domain::role::RoleSet;

use crate::domain::types::{ActivationCode, User};
use crate::error::AccountsServiceError;

/// Port over the user store.
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountsServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AccountsServiceError>;

    async fn find_by_reset_code(&self, code: &str) -> Result<Option<User>, AccountsServiceError>;

    /// Insert a new user. A unique-email violation surfaces as
    /// `DuplicateEmail`.
    async fn create(&self, user: &User) -> Result<(), AccountsServiceError>;

    async fn set_enabled(&self, id: Uuid, enabled: bool) -> Result<(), AccountsServiceError>;

    /// Stamp the durable lock on a user record.
    async fn set_locked(
        &self,
        id: Uuid,
        locked_at: DateTime<Utc>,
        unlock_at: DateTime<Utc>,
    ) -> Result<(), AccountsServiceError>;

    /// Store a reset code and its expiry, superseding any outstanding one.
    async fn set_reset_code(
        &self,
        id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AccountsServiceError>;

    /// Complete a password reset in one guarded write: swap in the new hash
    /// and clear the reset fields and lock, but only while `expected_code`
    /// is still the stored code. Returns false when another submission got
    /// there first.
    async fn finish_reset(
        &self,
        id: Uuid,
        expected_code: &str,
        new_password_hash: &str,
    ) -> Result<bool, AccountsServiceError>;
}

/// Port over the activation-code store.
pub trait ActivationCodeRepository: Send + Sync {
    async fn create(&self, code: &ActivationCode) -> Result<(), AccountsServiceError>;

    /// Newest code whose value matches, consumed or not.
    async fn find_by_code(
        &self,
        code: &str,
    ) -> Result<Option<ActivationCode>, AccountsServiceError>;

    /// Mark a code validated. Returns false if it was already consumed; at
    /// most one concurrent caller wins.
    async fn consume(&self, id: Uuid) -> Result<bool, AccountsServiceError>;
}

/// Port over the password-hashing primitive.
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, plaintext: &str) -> Result<String, AccountsServiceError>;

    /// Verify `plaintext` against a stored hash. The comparison must not
    /// leak the mismatch position through timing.
    async fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, AccountsServiceError>;
}

/// Port over session-token minting.
pub trait SessionTokenMinter: Send + Sync {
    fn mint(
        &self,
        subject: Uuid,
        display_name: &str,
        roles: RoleSet,
    ) -> Result<String, AccountsServiceError>;
}

/// Port over outbound notifications. Callers treat delivery as best-effort:
/// failures are logged, never surfaced as operation errors.
pub trait Notifier: Send + Sync {
    async fn send_activation(&self, user: &User, code: &str) -> Result<(), AccountsServiceError>;

    async fn send_password_reset(
        &self,
        user: &User,
        reset_link: &str,
    ) -> Result<(), AccountsServiceError>;
}
