use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::attempts::LoginAttemptTracker;
use crate::events::AccountEvents;
use crate::infra::db::{DbActivationCodeRepository, DbUserRepository};
use crate::infra::hasher::Argon2PasswordHasher;
use crate::infra::mailer::Mailer;
use crate::infra::token::JwtSessionMinter;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub attempts: Arc<LoginAttemptTracker>,
    pub events: Arc<dyn AccountEvents>,
    pub notifier: Mailer,
    pub jwt_secret: String,
    pub reset_password_url: String,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository { db: self.db.clone() }
    }

    pub fn activation_code_repo(&self) -> DbActivationCodeRepository {
        DbActivationCodeRepository { db: self.db.clone() }
    }

    pub fn password_hasher(&self) -> Argon2PasswordHasher {
        Argon2PasswordHasher
    }

    pub fn session_minter(&self) -> JwtSessionMinter {
        JwtSessionMinter { secret: self.jwt_secret.clone() }
    }
}
