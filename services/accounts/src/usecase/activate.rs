use std::sync::Arc;

use crate::domain::repository::{ActivationCodeRepository, Notifier, UserRepository};
use crate::error::AccountsServiceError;
use crate::events::{AccountEvent, AccountEvents};
use crate::usecase::codes::issue_activation;

pub struct ActivateAccountUseCase<U, A, N>
where
    U: UserRepository,
    A: ActivationCodeRepository,
    N: Notifier,
{
    pub users: U,
    pub codes: A,
    pub notifier: N,
    pub events: Arc<dyn AccountEvents>,
}

impl<U, A, N> ActivateAccountUseCase<U, A, N>
where
    U: UserRepository,
    A: ActivationCodeRepository,
    N: Notifier,
{
    pub async fn execute(&self, code: &str) -> Result<bool, AccountsServiceError> {
        // 1. Find the code → 401 if unknown or already consumed
        let record = self
            .codes
            .find_by_code(code)
            .await?
            .ok_or(AccountsServiceError::InvalidToken)?;
        if record.validated_at.is_some() {
            return Err(AccountsServiceError::InvalidToken);
        }

        let user = self
            .users
            .find_by_id(record.user_id)
            .await?
            .ok_or(AccountsServiceError::InvalidToken)?;

        // 2. Expired code: reissue first, then surface the expiry. A reissue
        //    failure must not mask the expiry error.
        if record.is_expired() {
            match issue_activation(&self.codes, &self.notifier, &user).await {
                Ok(_) => self
                    .events
                    .emit(AccountEvent::ActivationExpiredReissued { user_id: user.id }),
                Err(e) => tracing::error!(error = %e, "failed to reissue activation code"),
            }
            return Err(AccountsServiceError::TokenExpired);
        }

        // 3. Consume atomically — concurrent submissions race here and at
        //    most one wins
        if !self.codes.consume(record.id).await? {
            return Err(AccountsServiceError::InvalidToken);
        }

        // 4. Enable the account
        self.users.set_enabled(user.id, true).await?;
        Ok(true)
    }
}
