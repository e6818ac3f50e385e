use chrono::Utc;
use uuid::Uuid;

use readnest_domain::role::RoleSet;

use crate::domain::repository::{
    ActivationCodeRepository, Notifier, PasswordHasher, UserRepository,
};
use crate::domain::types::{MIN_PASSWORD_LEN, User, normalize_email, valid_email};
use crate::error::AccountsServiceError;
use crate::usecase::codes::issue_activation;

pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

pub struct RegisterUseCase<U, A, H, N>
where
    U: UserRepository,
    A: ActivationCodeRepository,
    H: PasswordHasher,
    N: Notifier,
{
    pub users: U,
    pub codes: A,
    pub hasher: H,
    pub notifier: N,
}

impl<U, A, H, N> RegisterUseCase<U, A, H, N>
where
    U: UserRepository,
    A: ActivationCodeRepository,
    H: PasswordHasher,
    N: Notifier,
{
    pub async fn execute(&self, input: RegisterInput) -> Result<(), AccountsServiceError> {
        // 1. Validate input → 400 on bad name/email/password
        if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
            return Err(AccountsServiceError::MissingName);
        }
        let email = normalize_email(&input.email);
        if !valid_email(&email) {
            return Err(AccountsServiceError::InvalidEmail);
        }
        if input.password.len() < MIN_PASSWORD_LEN {
            return Err(AccountsServiceError::WeakPassword);
        }

        // 2. Pre-check the email for a clean 409; the unique constraint
        //    still decides under races
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AccountsServiceError::DuplicateEmail);
        }

        // 3. Hash password + persist the disabled account
        let password_hash = self.hasher.hash(&input.password).await?;
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            first_name: input.first_name.trim().to_owned(),
            last_name: input.last_name.trim().to_owned(),
            email,
            password_hash,
            enabled: false,
            account_locked: false,
            locked_at: None,
            unlock_at: None,
            reset_code: None,
            reset_code_expires_at: None,
            roles: RoleSet::base(),
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await?;

        // 4. Issue the activation code (delivery is best-effort)
        issue_activation(&self.codes, &self.notifier, &user).await?;
        Ok(())
    }
}
