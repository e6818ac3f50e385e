use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::attempts::LoginAttemptTracker;
use crate::domain::repository::{Notifier, PasswordHasher, UserRepository};
use crate::domain::types::{RESET_CODE_TTL_SECS, normalize_email};
use crate::error::AccountsServiceError;
use crate::usecase::codes::{generate_code, reset_signature, validate_reset};

// ── Request ──────────────────────────────────────────

pub struct RequestPasswordResetUseCase<U, N>
where
    U: UserRepository,
    N: Notifier,
{
    pub users: U,
    pub notifier: N,
    /// Base URL of the reset page; code and signature ride as query
    /// parameters.
    pub reset_url: String,
}

impl<U, N> RequestPasswordResetUseCase<U, N>
where
    U: UserRepository,
    N: Notifier,
{
    pub async fn execute(&self, email: &str) -> Result<(), AccountsServiceError> {
        // 1. Find user by email → 404 if not found
        let email = normalize_email(email);
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AccountsServiceError::UserNotFound)?;

        // 2. Store a fresh code, superseding any outstanding one — a single
        //    live reset per user
        let code = generate_code();
        let signature = reset_signature(&code);
        let expires_at = Utc::now() + Duration::seconds(RESET_CODE_TTL_SECS);
        self.users.set_reset_code(user.id, &code, expires_at).await?;

        // 3. Send the link (best-effort)
        let link = format!("{}?code={}&signature={}", self.reset_url, code, signature);
        if let Err(e) = self.notifier.send_password_reset(&user, &link).await {
            tracing::warn!(error = %e, "password reset email delivery failed");
        }
        Ok(())
    }
}

// ── Submit ───────────────────────────────────────────

pub struct ResetPasswordInput {
    pub code: String,
    pub signature: String,
    pub new_password: String,
}

pub struct ResetPasswordUseCase<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    pub users: U,
    pub hasher: H,
    pub attempts: Arc<LoginAttemptTracker>,
}

impl<U, H> ResetPasswordUseCase<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    pub async fn execute(&self, input: ResetPasswordInput) -> Result<(), AccountsServiceError> {
        // 1. Find the holder of the code → 401 if nobody has it
        let user = self
            .users
            .find_by_reset_code(&input.code)
            .await?
            .ok_or(AccountsServiceError::InvalidToken)?;

        // 2. Signature and expiry checks against the stored fields
        validate_reset(&user, &input.code, &input.signature, Utc::now())?;

        // 3. Hash the replacement. A reset proves ownership; no password
        //    policy applies on this path.
        let new_hash = self.hasher.hash(&input.new_password).await?;

        // 4. Guarded swap — concurrent submissions of the same code race
        //    here and at most one wins. The winner also clears the durable
        //    lock.
        if !self.users.finish_reset(user.id, &input.code, &new_hash).await? {
            return Err(AccountsServiceError::InvalidToken);
        }

        // 5. Proof of ownership clears the in-memory counter too
        self.attempts.evict(&user.email);
        Ok(())
    }
}
