use chrono::Utc;
use uuid::Uuid;

use readnest_domain::role::{Role, RoleSet};

use crate::domain::repository::{PasswordHasher, UserRepository};
use crate::domain::types::{User, normalize_email};
use crate::error::AccountsServiceError;

/// Startup seeding of the admin account. Idempotent: an existing account
/// with the configured email is left untouched.
pub struct EnsureAdminUseCase<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    pub users: U,
    pub hasher: H,
}

impl<U, H> EnsureAdminUseCase<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    pub async fn execute(&self, email: &str, password: &str) -> Result<(), AccountsServiceError> {
        let email = normalize_email(email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Ok(());
        }

        let password_hash = self.hasher.hash(password).await?;
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            first_name: "Readnest".to_owned(),
            last_name: "Admin".to_owned(),
            email,
            password_hash,
            enabled: true,
            account_locked: false,
            locked_at: None,
            unlock_at: None,
            reset_code: None,
            reset_code_expires_at: None,
            roles: RoleSet::base().with(Role::Admin),
            created_at: now,
            updated_at: now,
        };
        match self.users.create(&user).await {
            // Another replica seeded first; same outcome.
            Err(AccountsServiceError::DuplicateEmail) => Ok(()),
            other => {
                if other.is_ok() {
                    tracing::info!("seeded admin account");
                }
                other
            }
        }
    }
}
