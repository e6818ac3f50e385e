use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::attempts::LoginAttemptTracker;
use crate::domain::repository::{PasswordHasher, SessionTokenMinter, UserRepository};
use crate::domain::types::{LOCKOUT_SECS, MAX_LOGIN_ATTEMPTS, normalize_email};
use crate::error::AccountsServiceError;
use crate::events::{AccountEvent, AccountEvents};

pub struct LoginInput {
    pub email: String,
    pub password: String,
    /// Caller-supplied page identifier, echoed back untouched.
    pub login_page: String,
}

#[derive(Debug)]
pub struct SessionResult {
    pub session_token: String,
    pub logged_in_at: DateTime<Utc>,
    pub login_page: String,
    pub attempt_count: u32,
}

pub struct LoginUseCase<U, H, M>
where
    U: UserRepository,
    H: PasswordHasher,
    M: SessionTokenMinter,
{
    pub users: U,
    pub hasher: H,
    pub minter: M,
    pub attempts: Arc<LoginAttemptTracker>,
    pub events: Arc<dyn AccountEvents>,
}

impl<U, H, M> LoginUseCase<U, H, M>
where
    U: UserRepository,
    H: PasswordHasher,
    M: SessionTokenMinter,
{
    pub async fn execute(&self, input: LoginInput) -> Result<SessionResult, AccountsServiceError> {
        let email = normalize_email(&input.email);

        // 1. Tracker gate — a capped key is refused before any store lookup
        if self.attempts.has_exceeded_max(&email) {
            return Err(AccountsServiceError::AccountLocked {
                attempts: self.attempts.count(&email),
            });
        }

        // 2. Unknown email counts a failure too, so the lockout threshold
        //    cannot be used to probe which emails exist
        let Some(user) = self.users.find_by_email(&email).await? else {
            let attempts = self.attempts.record_failure(&email);
            if attempts >= MAX_LOGIN_ATTEMPTS {
                return Err(AccountsServiceError::AccountLocked { attempts });
            }
            return Err(AccountsServiceError::InvalidCredentials { attempts });
        };

        let now = Utc::now();

        // 3. Durable lock — survives tracker expiry and restarts. Once the
        //    unlock time passes the lock stops blocking, but the flag itself
        //    is only cleared by a password reset.
        if user.is_locked(now) {
            return Err(AccountsServiceError::AccountLocked {
                attempts: self.attempts.count(&email),
            });
        }

        // 4. A not-yet-activated account never gets a session, and does not
        //    move the failure counter
        if !user.enabled {
            return Err(AccountsServiceError::InvalidCredentials {
                attempts: self.attempts.count(&email),
            });
        }

        // 5. Verify the password; the capping failure stamps the durable lock
        if !self.hasher.verify(&input.password, &user.password_hash).await? {
            let attempts = self.attempts.record_failure(&email);
            if attempts >= MAX_LOGIN_ATTEMPTS {
                let unlock_at = now + Duration::seconds(LOCKOUT_SECS);
                self.users.set_locked(user.id, now, unlock_at).await?;
                self.events.emit(AccountEvent::AccountLocked {
                    user_id: user.id,
                    unlock_at,
                });
                return Err(AccountsServiceError::AccountLocked { attempts });
            }
            return Err(AccountsServiceError::InvalidCredentials { attempts });
        }

        // 6. Success: clear the counter, mint the session
        self.attempts.reset(&email);
        let session_token = self
            .minter
            .mint(user.id, &user.display_name(), user.roles)?;
        Ok(SessionResult {
            session_token,
            logged_in_at: now,
            login_page: input.login_page,
            attempt_count: self.attempts.count(&email),
        })
    }
}
